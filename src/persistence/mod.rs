//! Session persistence
//!
//! Features:
//! - Session record in local storage, merged key by key
//! - Shareable `data` query parameter (difficulty, gamemode, config)
//! - Load precedence: a parsable URL payload beats storage
//!
//! Browser globals are reached only through the ports below so the
//! bridge and the game controller can run against in-memory doubles.

pub mod bridge;
pub mod session;

pub use bridge::{LoadedSession, PersistenceBridge};
pub use session::{SessionRecord, SharedSelection};

use crate::error::PersistError;

/// Key/value store (local storage on the web)
pub trait StoragePort {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
}

/// Page URL access
pub trait NavigationPort {
    /// Decoded value of the `data` query parameter, if present
    fn query_data(&self) -> Option<String>;
    /// Replace the `data` query parameter without adding a history entry
    fn replace_query_data(&mut self, data: &str);
}

/// Document-level presentation hooks
pub trait DocumentPort {
    /// System colour-scheme preference
    fn prefers_dark(&self) -> bool;
    /// Toggle the dark theme class on the document body
    fn apply_dark_mode(&mut self, enabled: bool);
    /// Viewport width in CSS pixels
    fn viewport_width(&self) -> f64;
}
