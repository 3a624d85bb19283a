pub mod keyboard;
pub mod pointer;

use crate::dom::Listener;
use crate::frame::FrameContext;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

/// Attaches every DOM listener the visualizer needs. Dropping the returned
/// listeners detaches them again.
pub fn wire_all(
    ctx: &Rc<RefCell<FrameContext>>,
    canvas: &web::HtmlCanvasElement,
) -> anyhow::Result<Vec<Listener>> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let mut listeners = pointer::wire_pointer(ctx, canvas)?;
    listeners.push(keyboard::wire_keydown(ctx, &window)?);

    let weak = Rc::downgrade(ctx);
    listeners.push(Listener::new(&window, "resize", move |_ev: web::Event| {
        if let Some(ctx) = weak.upgrade() {
            ctx.borrow_mut().resize_to_canvas();
        }
    })?);
    Ok(listeners)
}
