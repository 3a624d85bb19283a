use crate::dom::Listener;
use crate::frame::FrameContext;
use crate::input;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Pointer move/down steer the repulsion target; leave/cancel release it.
pub fn wire_pointer(
    ctx: &Rc<RefCell<FrameContext>>,
    canvas: &web::HtmlCanvasElement,
) -> anyhow::Result<Vec<Listener>> {
    let mut listeners = Vec::with_capacity(4);
    for kind in ["pointermove", "pointerdown"] {
        let weak = Rc::downgrade(ctx);
        let canvas_cb = canvas.clone();
        listeners.push(Listener::new(canvas, kind, move |ev: web::Event| {
            let Some(ctx) = weak.upgrade() else {
                return;
            };
            let Ok(pev) = ev.dyn_into::<web::PointerEvent>() else {
                return;
            };
            if let Some(uv) = input::pointer_canvas_uv(&pev, &canvas_cb) {
                ctx.borrow_mut().scene.pointer_moved(uv);
            }
        })?);
    }
    for kind in ["pointerleave", "pointercancel"] {
        let weak = Rc::downgrade(ctx);
        listeners.push(Listener::new(canvas, kind, move |_ev: web::Event| {
            if let Some(ctx) = weak.upgrade() {
                ctx.borrow_mut().scene.pointer_left();
            }
        })?);
    }
    Ok(listeners)
}
