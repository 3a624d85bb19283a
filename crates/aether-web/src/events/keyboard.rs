use crate::constants::SCREENSHOT_FILENAME;
use crate::dom::{self, Listener};
use crate::frame::FrameContext;
use aether_core::keymap::{action_for_key, KeyAction};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn handle_key_action(ctx: &mut FrameContext, action: KeyAction) {
    match action {
        KeyAction::SetMode(mode) => {
            if let Err(e) = ctx.set_mode(mode) {
                log::warn!("[keys] {}", e);
            }
        }
        KeyAction::NextPalette => ctx.cycle_palette(),
        KeyAction::TogglePlayback => ctx.toggle_playback(),
        KeyAction::NextTrack => ctx.next_track(),
        KeyAction::VolumeStep(delta) => ctx.step_volume(delta),
        KeyAction::Capture => {
            if let Some(url) = ctx.capture() {
                if let Err(e) = dom::download_data_url(&url, SCREENSHOT_FILENAME) {
                    log::warn!("[capture] {:?}", e);
                }
            }
        }
    }
}

pub fn wire_keydown(ctx: &Rc<RefCell<FrameContext>>, window: &web::Window) -> anyhow::Result<Listener> {
    let weak = Rc::downgrade(ctx);
    Listener::new(window, "keydown", move |ev: web::Event| {
        let Some(ctx) = weak.upgrade() else {
            return;
        };
        let Ok(kev) = ev.dyn_into::<web::KeyboardEvent>() else {
            return;
        };
        // leave browser shortcuts alone
        if kev.ctrl_key() || kev.meta_key() || kev.alt_key() {
            return;
        }
        let Some(action) = action_for_key(&kev.key()) else {
            return;
        };
        if matches!(action, KeyAction::TogglePlayback) {
            // space would otherwise scroll the page
            kev.prevent_default();
        }
        handle_key_action(&mut ctx.borrow_mut(), action);
    })
}
