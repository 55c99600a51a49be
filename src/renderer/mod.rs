//! Wheel rendering
//!
//! `layout` computes screen geometry; `canvas` paints it with Canvas 2D.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod layout;

#[cfg(target_arch = "wasm32")]
pub use canvas::WheelCanvas;
pub use layout::{Wedge, WheelLayout};
