//! Platform abstraction layer
//!
//! Port implementations for:
//! - Browser (LocalStorage, URL/History, body class list) on wasm32
//! - In-memory doubles for native builds and tests

pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;
