use aether_core::{SceneConfig, Viewport};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Creates the full-size canvas the renderer draws into and appends it to
/// `container`.
pub fn create_canvas(container: &web::HtmlElement) -> anyhow::Result<web::HtmlCanvasElement> {
    let document = window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("create canvas: {:?}", e))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|_| anyhow::anyhow!("element is not a canvas"))?;
    let style = canvas.style();
    for (prop, value) in [
        ("display", "block"),
        ("width", "100%"),
        ("height", "100%"),
        // pointer events must reach us on touch screens too
        ("touch-action", "none"),
    ] {
        style
            .set_property(prop, value)
            .map_err(|e| anyhow::anyhow!("canvas style {}: {:?}", prop, e))?;
    }
    container
        .append_child(&canvas)
        .map_err(|e| anyhow::anyhow!("append canvas: {:?}", e))?;
    Ok(canvas)
}

/// Matches the canvas backing store to its CSS size times the clamped
/// device pixel ratio and returns the resulting viewport.
pub fn sync_canvas_backing_size(
    canvas: &web::HtmlCanvasElement,
    config: &SceneConfig,
) -> Viewport {
    let dpr = web::window().map_or(1.0, |w| w.device_pixel_ratio());
    let ratio = config.clamp_pixel_ratio(dpr);
    let rect = canvas.get_bounding_client_rect();
    let w_px = ((rect.width() as f32) * ratio) as u32;
    let h_px = ((rect.height() as f32) * ratio) as u32;
    if canvas.width() != w_px.max(1) {
        canvas.set_width(w_px.max(1));
    }
    if canvas.height() != h_px.max(1) {
        canvas.set_height(h_px.max(1));
    }
    Viewport::new(canvas.width(), canvas.height(), ratio)
}

/// Saves a data URL through a temporary download link.
pub fn download_data_url(url: &str, filename: &str) -> anyhow::Result<()> {
    let document = window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let link = document
        .create_element("a")
        .map_err(|e| anyhow::anyhow!("create link: {:?}", e))?
        .dyn_into::<web::HtmlAnchorElement>()
        .map_err(|_| anyhow::anyhow!("element is not an anchor"))?;
    link.set_href(url);
    link.set_download(filename);
    link.click();
    Ok(())
}

/// An event listener that is removed from its target when dropped.
pub struct Listener {
    target: web::EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

impl Listener {
    pub fn new(
        target: &web::EventTarget,
        kind: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> anyhow::Result<Self> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!("add {} listener: {:?}", kind, e))?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}
