//! Snapshot of the state a hosting page binds its controls to.

use crate::palette::PALETTES;
use crate::shapes::VisualMode;
use crate::synth::TRACKS;

#[derive(Clone, Debug, PartialEq)]
pub struct HudState {
    pub playing: bool,
    pub track: Option<usize>,
    pub mode: usize,
    pub palette: usize,
    pub volume: f32,
}

impl HudState {
    pub fn track_title(&self) -> Option<&'static str> {
        self.track.and_then(|t| TRACKS.get(t)).map(|t| t.title)
    }

    pub fn mode_name(&self) -> &'static str {
        VisualMode::from_index(self.mode)
            .unwrap_or(VisualMode::Sphere)
            .name()
    }

    pub fn palette_name(&self) -> &'static str {
        PALETTES.get(self.palette).map_or("", |p| p.name)
    }
}
