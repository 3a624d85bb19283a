use crate::blend::decay_alpha;
use crate::constants::{POINTER_FAR_THRESHOLD, POINTER_SENTINEL};
use glam::Vec3;

/// Pointer position in world space.
///
/// Input handlers only write `target`; the frame loop reads `smoothed`. When
/// the pointer leaves, the target becomes a far-off sentinel and the smoothed
/// value drifts out of the field.
#[derive(Clone, Copy, Debug)]
pub struct PointerTarget {
    target: Vec3,
    smoothed: Vec3,
    rate: f32,
}

pub fn pointer_sentinel() -> Vec3 {
    Vec3::from_array(POINTER_SENTINEL)
}

#[inline]
fn is_off_scene(p: Vec3) -> bool {
    p.abs().max_element() >= POINTER_FAR_THRESHOLD
}

impl PointerTarget {
    pub fn new(rate: f32) -> Self {
        Self {
            target: pointer_sentinel(),
            smoothed: pointer_sentinel(),
            rate,
        }
    }

    pub fn set_target(&mut self, world: Vec3) {
        self.target = world;
    }

    pub fn release(&mut self) {
        self.target = pointer_sentinel();
    }

    pub fn step(&mut self, dt_sec: f32) {
        // entering from off-scene: jump instead of sweeping across the field
        if is_off_scene(self.smoothed) && !is_off_scene(self.target) {
            self.smoothed = self.target;
            return;
        }
        self.smoothed += (self.target - self.smoothed) * decay_alpha(self.rate, dt_sec);
        if is_off_scene(self.target) && is_off_scene(self.smoothed) {
            self.smoothed = self.target;
        }
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn smoothed(&self) -> Vec3 {
        self.smoothed
    }

    pub fn active(&self) -> bool {
        !is_off_scene(self.smoothed)
    }
}
