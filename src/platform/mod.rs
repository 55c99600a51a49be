//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (wall clock and frame clock)
//! - Storage (LocalStorage on web, in-memory elsewhere)
//! - Frame scheduling (requestAnimationFrame on web)

#[cfg(target_arch = "wasm32")]
pub mod frame;
pub mod storage;
pub mod time;

pub use storage::{KeyValueStore, MemoryStore, StorageError};
pub use time::{frame_clock_ms, now_ms};
