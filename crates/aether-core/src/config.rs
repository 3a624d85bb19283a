//! Runtime-selectable scene settings.
//!
//! Everything here has a default taken from `constants.rs`; the web frontend
//! mounts with `SceneConfig::default()`.

use crate::constants::*;
use crate::field::DeviceClass;

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub desktop_particles: u32,
    pub mobile_particles: u32,
    pub mobile_breakpoint_px: f32,
    pub field_seed: u64,
    pub mode_decay: f32,
    pub color_decay: f32,
    pub audio_level_decay: f32,
    pub pointer_decay: f32,
    pub bloom: BloomSettings,
    pub max_pixel_ratio: f32,
    pub point_size_px: f32,
    pub initial_palette: usize,
    pub initial_volume: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BloomSettings {
    pub strength: f32,
    pub threshold: f32,
    pub chroma_offset: f32,
    pub grain: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            strength: BLOOM_STRENGTH,
            threshold: BLOOM_THRESHOLD,
            chroma_offset: CHROMA_OFFSET,
            grain: GRAIN_AMOUNT,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            desktop_particles: DESKTOP_PARTICLE_COUNT,
            mobile_particles: MOBILE_PARTICLE_COUNT,
            mobile_breakpoint_px: MOBILE_BREAKPOINT_PX,
            field_seed: FIELD_SEED,
            mode_decay: MODE_DECAY_PER_FRAME,
            color_decay: COLOR_DECAY_PER_FRAME,
            audio_level_decay: AUDIO_LEVEL_DECAY_PER_FRAME,
            pointer_decay: POINTER_DECAY_PER_FRAME,
            bloom: BloomSettings::default(),
            max_pixel_ratio: MAX_PIXEL_RATIO,
            point_size_px: POINT_SIZE_PX,
            initial_palette: 0,
            initial_volume: DEFAULT_VOLUME,
        }
    }
}

impl SceneConfig {
    /// Device class for a container of the given CSS width.
    pub fn device_class_for_width(&self, css_width: f32) -> DeviceClass {
        if css_width < self.mobile_breakpoint_px {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }

    /// Particle budget for a device class. Mobile never exceeds the mobile cap
    /// even if the desktop count is configured lower.
    pub fn particle_count(&self, class: DeviceClass) -> u32 {
        match class {
            DeviceClass::Desktop => self.desktop_particles,
            DeviceClass::Mobile => self.mobile_particles.min(self.desktop_particles),
        }
    }

    pub fn clamp_pixel_ratio(&self, dpr: f64) -> f32 {
        (dpr as f32).clamp(1.0, self.max_pixel_ratio)
    }
}
