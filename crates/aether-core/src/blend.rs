//! Mode/palette blend controller.
//!
//! User choices only move targets; [`BlendController::advance`] eases the
//! current values toward them once per frame. The step is an exponential
//! approach with a per-frame rate defined at 60 Hz and rescaled by `dt`, so
//! transitions take the same wall-clock time on any refresh rate.

use crate::constants::{COLOR_SNAP_EPSILON, MODE_SNAP_EPSILON, REFERENCE_FPS};
use crate::error::{AetherError, Result};
use crate::palette::{palette, PALETTES};
use crate::shapes::{VisualMode, MAX_MODE_VALUE};
use glam::Vec3;

/// Fraction of the remaining distance covered in `dt_sec` for a rate given
/// per reference frame.
#[inline]
pub fn decay_alpha(rate_per_frame: f32, dt_sec: f32) -> f32 {
    let rate = rate_per_frame.clamp(0.0, 1.0);
    let frames = (dt_sec.max(0.0) * REFERENCE_FPS).max(0.0);
    1.0 - (1.0 - rate).powf(frames)
}

/// Exponential tracker for one scalar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tracker {
    pub current: f32,
    pub target: f32,
    pub rate: f32,
    pub epsilon: f32,
}

impl Tracker {
    pub fn new(value: f32, rate: f32, epsilon: f32) -> Self {
        Self {
            current: value,
            target: value,
            rate,
            epsilon,
        }
    }

    /// Moves `current` toward `target`. Alpha never exceeds 1, so the value
    /// cannot overshoot; once inside `epsilon` it snaps exactly.
    pub fn step(&mut self, dt_sec: f32) {
        let delta = self.target - self.current;
        if delta.abs() <= self.epsilon {
            self.current = self.target;
            return;
        }
        self.current += delta * decay_alpha(self.rate, dt_sec);
        if (self.target - self.current).abs() <= self.epsilon {
            self.current = self.target;
        }
    }

    pub fn settled(&self) -> bool {
        self.current == self.target
    }
}

/// Exponential tracker for an RGB colour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorTracker {
    pub current: Vec3,
    pub target: Vec3,
    pub rate: f32,
}

impl ColorTracker {
    pub fn new(value: Vec3, rate: f32) -> Self {
        Self {
            current: value,
            target: value,
            rate,
        }
    }

    pub fn step(&mut self, dt_sec: f32) {
        let delta = self.target - self.current;
        if delta.abs().max_element() <= COLOR_SNAP_EPSILON {
            self.current = self.target;
            return;
        }
        self.current += delta * decay_alpha(self.rate, dt_sec);
    }
}

#[derive(Clone, Debug)]
pub struct BlendController {
    mode: Tracker,
    color1: ColorTracker,
    color2: ColorTracker,
    palette_index: usize,
}

impl BlendController {
    pub fn new(mode_rate: f32, color_rate: f32, initial_palette: usize) -> Self {
        let palette_index = initial_palette.min(PALETTES.len() - 1);
        let (c1, c2) = PALETTES[palette_index].colors();
        Self {
            mode: Tracker::new(0.0, mode_rate, MODE_SNAP_EPSILON),
            color1: ColorTracker::new(c1, color_rate),
            color2: ColorTracker::new(c2, color_rate),
            palette_index,
        }
    }

    pub fn set_mode(&mut self, index: usize) -> Result<()> {
        let mode = VisualMode::from_index(index).ok_or(AetherError::UnknownMode(index))?;
        self.mode.target = (mode.index() as f32).min(MAX_MODE_VALUE);
        log::debug!("[blend] mode target -> {}", mode.name());
        Ok(())
    }

    pub fn set_palette(&mut self, index: usize) -> Result<()> {
        let p = palette(index).ok_or(AetherError::UnknownPalette(index))?;
        let (c1, c2) = p.colors();
        self.color1.target = c1;
        self.color2.target = c2;
        self.palette_index = index;
        log::debug!("[blend] palette target -> {}", p.name);
        Ok(())
    }

    pub fn advance(&mut self, dt_sec: f32) {
        self.mode.step(dt_sec);
        self.color1.step(dt_sec);
        self.color2.step(dt_sec);
    }

    pub fn mode_value(&self) -> f32 {
        self.mode.current
    }

    pub fn mode_target(&self) -> usize {
        self.mode.target as usize
    }

    pub fn palette_index(&self) -> usize {
        self.palette_index
    }

    pub fn colors(&self) -> (Vec3, Vec3) {
        (self.color1.current, self.color2.current)
    }
}
