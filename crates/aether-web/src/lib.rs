#![cfg(target_arch = "wasm32")]
mod audio;
mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod render;

use aether_core::hud::HudState;
use aether_core::synth::TRACKS;
use aether_core::{Scene, SceneConfig, VisualMode, PALETTES};
use dom::Listener;
use frame::{AnimationLoop, FrameContext};
use render::GpuState;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("aether-web loaded");
    Ok(())
}

struct Mounted {
    ctx: Rc<RefCell<FrameContext>>,
    animation: AnimationLoop,
    listeners: Vec<Listener>,
}

/// Lifecycle handle returned by [`mount`]. Every method is a no-op once
/// `dispose` has run.
#[wasm_bindgen]
pub struct AetherHandle {
    inner: Option<Mounted>,
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Creates a canvas inside `container` and starts the visualizer.
#[wasm_bindgen]
pub async fn mount(container: web::HtmlElement) -> Result<AetherHandle, JsValue> {
    mount_inner(container).await.map_err(|e| JsValue::from_str(&format!("{:?}", e)))
}

async fn mount_inner(container: web::HtmlElement) -> anyhow::Result<AetherHandle> {
    let canvas = dom::create_canvas(&container)?;
    let config = SceneConfig::default();
    let viewport = dom::sync_canvas_backing_size(&canvas, &config);
    let scene = Scene::new(config, viewport);

    let gpu = match GpuState::new(&canvas, scene.field(), scene.config().bloom).await {
        Ok(gpu) => Some(gpu),
        Err(e) => {
            log::error!("[render] WebGPU unavailable, drawing disabled: {:?}", e);
            None
        }
    };

    let ctx = Rc::new(RefCell::new(FrameContext::new(scene, gpu, canvas.clone())));
    let listeners = match events::wire_all(&ctx, &canvas) {
        Ok(l) => l,
        Err(e) => {
            ctx.borrow_mut().dispose();
            return Err(e);
        }
    };
    let animation = AnimationLoop::start(Rc::downgrade(&ctx));
    log::info!("[mount] visualizer mounted");
    Ok(AetherHandle {
        inner: Some(Mounted {
            ctx,
            animation,
            listeners,
        }),
    })
}

#[wasm_bindgen]
impl AetherHandle {
    /// Stops the loop, detaches listeners, closes audio and frees GPU
    /// resources. Safe to call more than once.
    pub fn dispose(&mut self) {
        let Some(mounted) = self.inner.take() else {
            return;
        };
        mounted.animation.stop();
        drop(mounted.listeners);
        mounted.ctx.borrow_mut().dispose();
        log::info!("[mount] visualizer disposed");
    }

    pub fn play_track(&self, id: usize) -> Result<(), JsValue> {
        match &self.inner {
            Some(m) => m.ctx.borrow_mut().play_track(id).map_err(to_js),
            None => Ok(()),
        }
    }

    pub fn stop_all(&self) {
        if let Some(m) = &self.inner {
            m.ctx.borrow_mut().stop_all();
        }
    }

    pub fn toggle_playback(&self) {
        if let Some(m) = &self.inner {
            m.ctx.borrow_mut().toggle_playback();
        }
    }

    pub fn set_volume(&self, volume: f32) {
        if let Some(m) = &self.inner {
            m.ctx.borrow_mut().set_volume(volume);
        }
    }

    pub fn set_mode(&self, index: usize) -> Result<(), JsValue> {
        match &self.inner {
            Some(m) => m.ctx.borrow_mut().set_mode(index).map_err(to_js),
            None => Ok(()),
        }
    }

    pub fn set_palette(&self, index: usize) -> Result<(), JsValue> {
        match &self.inner {
            Some(m) => m.ctx.borrow_mut().set_palette(index).map_err(to_js),
            None => Ok(()),
        }
    }

    /// PNG data URL of the current frame.
    pub fn capture_frame(&self) -> Option<String> {
        self.inner.as_ref().and_then(|m| m.ctx.borrow_mut().capture())
    }

    pub fn hud_state(&self) -> JsValue {
        match &self.inner {
            Some(m) => hud_object(&m.ctx.borrow().hud()).into(),
            None => JsValue::NULL,
        }
    }
}

fn set_prop(obj: &js_sys::Object, key: &str, value: impl Into<JsValue>) {
    let _ = js_sys::Reflect::set(obj, &JsValue::from_str(key), &value.into());
}

fn rgb_array(c: [f32; 3]) -> js_sys::Array {
    c.iter().map(|v| JsValue::from_f64(*v as f64)).collect()
}

fn hud_object(hud: &HudState) -> js_sys::Object {
    let obj = js_sys::Object::new();
    set_prop(&obj, "playing", hud.playing);
    match hud.track {
        Some(t) => set_prop(&obj, "track", t as u32),
        None => set_prop(&obj, "track", JsValue::NULL),
    }
    match hud.track_title() {
        Some(title) => set_prop(&obj, "trackTitle", title),
        None => set_prop(&obj, "trackTitle", JsValue::NULL),
    }
    set_prop(&obj, "mode", hud.mode as u32);
    set_prop(&obj, "modeName", hud.mode_name());
    set_prop(&obj, "palette", hud.palette as u32);
    set_prop(&obj, "paletteName", hud.palette_name());
    set_prop(&obj, "volume", hud.volume);
    obj
}

#[wasm_bindgen]
pub fn tracks() -> js_sys::Array {
    TRACKS
        .iter()
        .map(|t| {
            let obj = js_sys::Object::new();
            set_prop(&obj, "id", t.id as u32);
            set_prop(&obj, "title", t.title);
            set_prop(&obj, "description", t.description);
            JsValue::from(obj)
        })
        .collect()
}

#[wasm_bindgen]
pub fn modes() -> js_sys::Array {
    VisualMode::ALL
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let obj = js_sys::Object::new();
            set_prop(&obj, "index", i as u32);
            set_prop(&obj, "name", m.name());
            JsValue::from(obj)
        })
        .collect()
}

#[wasm_bindgen]
pub fn palettes() -> js_sys::Array {
    PALETTES
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let obj = js_sys::Object::new();
            set_prop(&obj, "index", i as u32);
            set_prop(&obj, "name", p.name);
            set_prop(&obj, "c1", rgb_array(p.c1));
            set_prop(&obj, "c2", rgb_array(p.c2));
            JsValue::from(obj)
        })
        .collect()
}
