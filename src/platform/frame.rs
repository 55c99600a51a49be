//! requestAnimationFrame scheduling

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// Schedule `callback` for the next display refresh
///
/// Returns the frame id for `cancel_frame`, or None if no window is available.
pub fn request_frame<F>(callback: F) -> Option<i32>
where
    F: FnOnce(f64) + 'static,
{
    let window = web_sys::window()?;
    let closure = Closure::once(move |time: f64| callback(time));
    let id = window
        .request_animation_frame(closure.as_ref().unchecked_ref())
        .ok()?;
    closure.forget();
    Some(id)
}

/// Cancel a frame scheduled by `request_frame`
pub fn cancel_frame(id: i32) {
    if let Some(window) = web_sys::window() {
        let _ = window.cancel_animation_frame(id);
    }
}
