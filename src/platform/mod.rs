//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (keyboard, pointer, touch -> Activate)
//! - Storage (LocalStorage on web, no-op natively)

pub mod input;
pub mod storage;
