use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, PointerEvent, Window};

use crate::input::{Mode, PointerSample};

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

pub fn set_canvas_cursor(canvas: &HtmlCanvasElement, cursor: &str) {
    let _ = canvas.style().set_property("cursor", cursor);
}

fn set_active(element: &Element, active: bool) {
    let classes = element.class_list();
    let _ = if active {
        classes.add_1("active")
    } else {
        classes.remove_1("active")
    };
}

pub fn set_mode_nav(pen_nav: &Element, hand_nav: &Element, mode: Mode) {
    set_active(pen_nav, mode == Mode::Draw);
    set_active(hand_nav, mode == Mode::Pan);
}

/// Sizes the backing store to the canvas' CSS box at device resolution.
/// Resizing wipes the pixels, so callers redraw afterwards. Returns the CSS
/// size the board is drawn in.
pub fn resize_canvas(
    window: &Window,
    canvas: &HtmlCanvasElement,
    ctx: &CanvasRenderingContext2d,
) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    let (width, height) = if rect.width() > 0.0 && rect.height() > 0.0 {
        (rect.width(), rect.height())
    } else {
        let width = window
            .inner_width()
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or_default();
        let height = window
            .inner_height()
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or_default();
        (width, height)
    };
    let dpr = window.device_pixel_ratio();
    canvas.set_width((width * dpr) as u32);
    canvas.set_height((height * dpr) as u32);
    let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    log::debug!("Canvas resized to {width}x{height} dpr={dpr}");
    (width, height)
}

pub fn pointer_sample(canvas: &HtmlCanvasElement, event: &PointerEvent) -> PointerSample {
    let rect = canvas.get_bounding_client_rect();
    PointerSample {
        pointer_id: event.pointer_id(),
        button: event.button(),
        is_primary: event.is_primary(),
        x: f64::from(event.client_x()) - rect.left(),
        y: f64::from(event.client_y()) - rect.top(),
    }
}
