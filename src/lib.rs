//! Periodic Quiz - find the target element on the periodic table
//!
//! Core modules:
//! - `catalog`: Element records, languages, hint formatting
//! - `layout`: Periodic table grid and display sizing
//! - `settings`: Difficulty presets and the editable settings store
//! - `round`: Round state machine (pool, target, timer, marks)
//! - `persistence`: Session record, URL payload, storage/navigation ports
//! - `platform`: Browser and in-memory port implementations
//! - `loader`: One-shot game data loading with session caching
//! - `game`: Controller tying settings, round and persistence together
//! - `server`: Static JSON config server (native only)

pub mod catalog;
pub mod error;
pub mod game;
pub mod layout;
pub mod loader;
pub mod persistence;
pub mod platform;
pub mod round;
#[cfg(not(target_arch = "wasm32"))]
pub mod server;
pub mod settings;

pub use catalog::{Catalog, Element, Language};
pub use error::{LoadError, PersistError};
pub use game::Game;
pub use round::{Round, RoundEvent, RoundPhase};
pub use settings::{Difficulty, DifficultyConfig, Gamemode, SettingEdit, SettingsStore};

/// Game configuration constants
pub mod consts {
    /// Number of elements in the table
    pub const ELEMENT_COUNT: usize = 118;
    /// Arcade countdown never starts below this many seconds
    pub const MIN_ARCADE_TIME: u32 = 25;
    /// Arcade timing inputs accept at most this many digits
    pub const MAX_ARCADE_DIGITS: usize = 5;
    /// Transient marks are released after this long (ms)
    pub const MARK_RELEASE_MS: i32 = 1500;
    /// Local storage key for the persisted session
    pub const STORAGE_KEY: &str = "periodicTableGame";
    /// URL query parameter carrying the shareable subset
    pub const URL_PARAM: &str = "data";
}
