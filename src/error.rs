//! Error types
//!
//! Every client failure degrades to an empty/default state after logging,
//! so these mostly exist to carry a readable message to `log`.

use thiserror::Error;

/// Failure while fetching or decoding a game data document
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("fetch of {url} failed: {reason}")]
    Fetch { url: String, reason: String },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("element catalog has {found} entries, expected {expected}")]
    CatalogSize { found: usize, expected: usize },
    #[error("element at index {index} has {protons} protons")]
    CatalogOrder { index: usize, protons: u32 },
}

/// Failure while writing the persisted session
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage write failed: {0}")]
    Storage(String),
    #[error("session encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}
