//! Per-frame scene state: everything the shader uniforms are derived from.
//!
//! `Scene::tick` fixes the order of one animation tick: the amplitude sample
//! is folded in first, then blend and pointer smoothing advance, then the
//! uniforms are packed. The web frame loop renders with exactly what `tick`
//! returned.

use crate::blend::{decay_alpha, BlendController};
use crate::camera::Camera;
use crate::config::SceneConfig;
use crate::constants::MAX_FRAME_DT_SEC;
use crate::error::Result;
use crate::field::{DeviceClass, ParticleField};
use crate::pointer::PointerTarget;
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32, pixel_ratio: f32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            pixel_ratio: pixel_ratio.max(0.5),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Width in CSS pixels, used to pick the device class.
    pub fn css_width(&self) -> f32 {
        self.width as f32 / self.pixel_ratio
    }
}

/// Smoothed audio level in [0, 1]. With no playback the raw sample is
/// treated as silence, so the level always decays back to zero.
#[derive(Clone, Copy, Debug)]
pub struct AudioLevel {
    level: f32,
    rate: f32,
}

impl AudioLevel {
    pub fn new(rate: f32) -> Self {
        Self { level: 0.0, rate }
    }

    pub fn step(&mut self, raw: Option<f32>, dt_sec: f32) {
        let target = raw.unwrap_or(0.0).clamp(0.0, 1.0);
        self.level += (target - self.level) * decay_alpha(self.rate, dt_sec);
        if self.level < 1e-5 {
            self.level = 0.0;
        }
    }

    pub fn value(&self) -> f32 {
        self.level
    }
}

/// Uniform block shared by the particle vertex and fragment stages.
/// Layout matches `struct Uniforms` in `particles.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// time, mode value, audio level, particle count
    pub params: [f32; 4],
    /// viewport width, viewport height, sprite size in px, lattice side
    pub view: [f32; 4],
    /// pointer xyz, 1.0 when on-scene
    pub pointer: [f32; 4],
    pub color1: [f32; 4],
    pub color2: [f32; 4],
}

pub struct Scene {
    config: SceneConfig,
    field: ParticleField,
    blend: BlendController,
    pointer: PointerTarget,
    audio: AudioLevel,
    camera: Camera,
    viewport: Viewport,
    time: f32,
    frames: u64,
}

impl Scene {
    /// Builds the scene and its particle field. The device class is chosen
    /// once from the viewport; a later class change needs a new `Scene`.
    pub fn new(config: SceneConfig, viewport: Viewport) -> Self {
        let class = config.device_class_for_width(viewport.css_width());
        let count = config.particle_count(class);
        let field = ParticleField::new(count, class, config.field_seed);
        let blend = BlendController::new(config.mode_decay, config.color_decay, config.initial_palette);
        let pointer = PointerTarget::new(config.pointer_decay);
        let audio = AudioLevel::new(config.audio_level_decay);
        let camera = Camera {
            aspect: viewport.aspect(),
            ..Camera::default()
        };
        log::info!(
            "[scene] {:?} field with {} particles at {}x{}",
            class,
            count,
            viewport.width,
            viewport.height
        );
        Self {
            config,
            field,
            blend,
            pointer,
            audio,
            camera,
            viewport,
            time: 0.0,
            frames: 0,
        }
    }

    /// Advances one animation tick and returns the uniforms for this frame.
    /// `amplitude` is the raw analyser level, `None` when nothing plays.
    pub fn tick(&mut self, dt_sec: f32, amplitude: Option<f32>) -> ParticleUniforms {
        let dt = if dt_sec.is_finite() {
            dt_sec.clamp(0.0, MAX_FRAME_DT_SEC)
        } else {
            0.0
        };
        self.audio.step(amplitude, dt);
        self.blend.advance(dt);
        self.pointer.step(dt);
        self.time += dt;
        self.frames += 1;
        self.uniforms()
    }

    /// Packs the current state without advancing it.
    pub fn uniforms(&self) -> ParticleUniforms {
        let (c1, c2) = self.blend.colors();
        let p = self.pointer.smoothed();
        ParticleUniforms {
            view_proj: self.camera.view_projection().to_cols_array_2d(),
            params: [
                self.time,
                self.blend.mode_value(),
                self.audio.value(),
                self.field.count() as f32,
            ],
            view: [
                self.viewport.width as f32,
                self.viewport.height as f32,
                self.config.point_size_px * self.viewport.pixel_ratio,
                self.field.lattice_side() as f32,
            ],
            pointer: [p.x, p.y, p.z, if self.pointer.active() { 1.0 } else { 0.0 }],
            color1: [c1.x, c1.y, c1.z, 1.0],
            color2: [c2.x, c2.y, c2.z, 1.0],
        }
    }

    /// Updates aspect-dependent state. The particle field is left alone.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.camera.aspect = viewport.aspect();
        log::debug!("[scene] resized to {}x{}", viewport.width, viewport.height);
    }

    pub fn set_mode(&mut self, index: usize) -> Result<()> {
        self.blend.set_mode(index)
    }

    pub fn set_palette(&mut self, index: usize) -> Result<()> {
        self.blend.set_palette(index)
    }

    /// Pointer moved to `uv` (normalized canvas coordinates).
    pub fn pointer_moved(&mut self, uv: Vec2) {
        match self.camera.screen_to_plane(uv, 0.0) {
            Some(world) => self.pointer.set_target(world),
            None => self.pointer.release(),
        }
    }

    pub fn pointer_left(&mut self) {
        self.pointer.release();
    }

    pub fn device_class(&self) -> DeviceClass {
        self.field.device_class()
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn blend(&self) -> &BlendController {
        &self.blend
    }

    pub fn pointer(&self) -> &PointerTarget {
        &self.pointer
    }

    pub fn audio_level(&self) -> f32 {
        self.audio.value()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
