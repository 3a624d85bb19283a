use crate::audio::WebAudioEngine;
use crate::dom;
use crate::render::GpuState;
use aether_core::hud::HudState;
use aether_core::keymap::next_index;
use aether_core::synth::TRACKS;
use aether_core::{AetherError, Scene, PALETTES};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Everything one animation frame touches. Shared between the RAF loop,
/// the DOM listeners and the exported handle.
pub struct FrameContext {
    pub scene: Scene,
    /// `None` without a WebGPU adapter; frames then only advance state.
    pub gpu: Option<GpuState>,
    /// Created on the first play request; contexts built before a user
    /// gesture would start suspended.
    pub audio: Option<WebAudioEngine>,
    pub canvas: web::HtmlCanvasElement,
    pub volume: f32,
    pub last_track: usize,
    pub last_instant: Instant,
}

impl FrameContext {
    pub fn new(scene: Scene, gpu: Option<GpuState>, canvas: web::HtmlCanvasElement) -> Self {
        let volume = scene.config().initial_volume.clamp(0.0, 1.0);
        Self {
            scene,
            gpu,
            audio: None,
            canvas,
            volume,
            last_track: 0,
            last_instant: Instant::now(),
        }
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;

        self.resize_to_canvas();
        let amplitude = self.audio.as_ref().and_then(|a| a.amplitude());
        let uniforms = self.scene.tick(dt_sec, amplitude);
        self.draw(&uniforms);
    }

    fn draw(&mut self, uniforms: &aether_core::ParticleUniforms) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        match gpu.render(uniforms) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.reconfigure(),
            Err(e) => log::warn!("[render] frame skipped: {:?}", e),
        }
    }

    /// Keeps the backing store, scene camera and GPU targets in step with
    /// the canvas' CSS size.
    pub fn resize_to_canvas(&mut self) {
        let viewport = dom::sync_canvas_backing_size(&self.canvas, self.scene.config());
        self.scene.resize(viewport);
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resize(viewport.width, viewport.height);
        }
    }

    fn ensure_audio(&mut self) -> Option<&WebAudioEngine> {
        if self.audio.is_none() {
            match WebAudioEngine::new(self.volume) {
                Ok(engine) => self.audio = Some(engine),
                Err(e) => {
                    log::error!("[audio] unavailable: {:?}", e);
                    return None;
                }
            }
        }
        self.audio.as_ref()
    }

    pub fn play_track(&mut self, id: usize) -> Result<(), AetherError> {
        if id >= TRACKS.len() {
            return Err(AetherError::UnknownTrack(id));
        }
        let volume = self.volume;
        let Some(audio) = self.ensure_audio() else {
            // without audio the visuals keep running silently
            return Ok(());
        };
        audio.play_track(id, volume)?;
        self.last_track = id;
        log::info!("[audio] playing {}", TRACKS[id].title);
        Ok(())
    }

    pub fn stop_all(&mut self) {
        if let Some(audio) = self.audio.as_ref() {
            audio.stop_all();
        }
    }

    pub fn is_playing(&self) -> bool {
        self.audio.as_ref().is_some_and(|a| a.is_playing())
    }

    pub fn toggle_playback(&mut self) {
        if self.is_playing() {
            self.stop_all();
        } else if let Err(e) = self.play_track(self.last_track) {
            log::warn!("[audio] {}", e);
        }
    }

    pub fn next_track(&mut self) {
        let current = self
            .audio
            .as_ref()
            .and_then(|a| a.current_track())
            .unwrap_or(self.last_track);
        if let Err(e) = self.play_track(next_index(current, TRACKS.len())) {
            log::warn!("[audio] {}", e);
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_finite() {
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(audio) = self.audio.as_ref() {
            audio.set_volume(self.volume);
        }
    }

    pub fn step_volume(&mut self, delta: f32) {
        self.set_volume(self.volume + delta);
    }

    pub fn set_mode(&mut self, index: usize) -> Result<(), AetherError> {
        self.scene.set_mode(index)
    }

    pub fn set_palette(&mut self, index: usize) -> Result<(), AetherError> {
        self.scene.set_palette(index)
    }

    pub fn cycle_palette(&mut self) {
        let next = next_index(self.scene.blend().palette_index(), PALETTES.len());
        if let Err(e) = self.scene.set_palette(next) {
            log::warn!("[scene] {}", e);
        }
    }

    /// Redraws the current state and reads the canvas back as a PNG data
    /// URL. Both happen in the same task so the drawing buffer is still
    /// populated.
    pub fn capture(&mut self) -> Option<String> {
        let uniforms = self.scene.uniforms();
        self.draw(&uniforms);
        match self.canvas.to_data_url() {
            Ok(url) => Some(url),
            Err(e) => {
                log::warn!("[capture] toDataURL failed: {:?}", e);
                None
            }
        }
    }

    pub fn hud(&self) -> HudState {
        HudState {
            playing: self.is_playing(),
            track: self.audio.as_ref().and_then(|a| a.current_track()),
            mode: self.scene.blend().mode_target(),
            palette: self.scene.blend().palette_index(),
            volume: self.volume,
        }
    }

    pub fn dispose(&mut self) {
        if let Some(audio) = self.audio.take() {
            audio.shutdown();
        }
        if let Some(gpu) = self.gpu.take() {
            gpu.destroy();
        }
        self.canvas.remove();
    }
}

/// requestAnimationFrame driver. The closure only holds weak references,
/// so dropping the context or calling `stop` ends the loop.
pub struct AnimationLoop {
    raf_id: Rc<Cell<Option<i32>>>,
    closure: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

fn request_frame(closure: &Closure<dyn FnMut()>) -> Option<i32> {
    let w = web::window()?;
    match w.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(id) => Some(id),
        Err(e) => {
            log::error!("requestAnimationFrame failed: {:?}", e);
            None
        }
    }
}

impl AnimationLoop {
    pub fn start(ctx: Weak<RefCell<FrameContext>>) -> Self {
        let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let closure: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

        let raf_tick = raf_id.clone();
        let closure_tick = Rc::downgrade(&closure);
        *closure.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            raf_tick.set(None);
            let Some(ctx) = ctx.upgrade() else {
                return;
            };
            ctx.borrow_mut().frame();
            if let Some(cell) = closure_tick.upgrade() {
                if let Some(cb) = cell.borrow().as_ref() {
                    raf_tick.set(request_frame(cb));
                }
            }
        }) as Box<dyn FnMut()>));

        if let Some(cb) = closure.borrow().as_ref() {
            raf_id.set(request_frame(cb));
        }
        Self { raf_id, closure }
    }

    pub fn stop(&self) {
        if let (Some(id), Some(w)) = (self.raf_id.take(), web::window()) {
            let _ = w.cancel_animation_frame(id);
        }
        self.closure.borrow_mut().take();
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
