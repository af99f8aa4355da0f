//! Storage + URL bridge

use super::session::{SessionRecord, SharedSelection};
use super::{NavigationPort, StoragePort};
use crate::catalog::Language;
use crate::consts::STORAGE_KEY;
use crate::error::PersistError;
use crate::layout::TableSize;
use crate::settings::{Difficulty, DifficultyConfig, Gamemode};

/// What a page load found, with the URL/storage precedence applied
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadedSession {
    pub stored: SessionRecord,
    /// Parsed `data` parameter, if present and valid
    pub shared: Option<SharedSelection>,
}

impl LoadedSession {
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.shared.map(|s| s.difficulty).or(self.stored.difficulty)
    }

    pub fn gamemode(&self) -> Option<Gamemode> {
        self.shared.map(|s| s.gamemode).or(self.stored.gamemode)
    }

    pub fn config(&self) -> Option<DifficultyConfig> {
        self.shared.map(|s| s.config).or(self.stored.config)
    }

    pub fn language(&self) -> Option<Language> {
        self.stored.language
    }

    pub fn dark_mode(&self) -> Option<bool> {
        self.stored.dark_mode
    }

    pub fn table_size(&self) -> Option<TableSize> {
        self.stored.table_size
    }
}

/// Owns the storage and navigation ports
pub struct PersistenceBridge<S, N> {
    storage: S,
    navigation: N,
}

impl<S: StoragePort, N: NavigationPort> PersistenceBridge<S, N> {
    pub fn new(storage: S, navigation: N) -> Self {
        Self { storage, navigation }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn navigation(&self) -> &N {
        &self.navigation
    }

    /// Current stored record (empty if missing or unreadable)
    pub fn read_session(&self) -> SessionRecord {
        self.storage
            .get_item(STORAGE_KEY)
            .map(|json| SessionRecord::parse(&json))
            .unwrap_or_default()
    }

    /// Merge `patch` into the stored record
    pub fn write_session(&mut self, patch: &SessionRecord) -> Result<(), PersistError> {
        let existing = self.storage.get_item(STORAGE_KEY);
        let merged = patch.merge_into(existing.as_deref())?;
        self.storage.set_item(STORAGE_KEY, &merged)
    }

    /// Parse the `data` query parameter; malformed values are logged and dropped
    pub fn shared_selection(&self) -> Option<SharedSelection> {
        let raw = self.navigation.query_data()?;
        match SharedSelection::from_json(&raw) {
            Ok(selection) => Some(selection),
            Err(e) => {
                log::error!("Ignoring malformed URL data: {}", e);
                None
            }
        }
    }

    pub fn load(&self) -> LoadedSession {
        let loaded = LoadedSession {
            stored: self.read_session(),
            shared: self.shared_selection(),
        };
        if loaded.shared.is_some() {
            log::info!("Selection restored from shared link");
        }
        loaded
    }

    /// Persist a settings change to storage and the URL.
    /// Failures are logged; the game carries on with in-memory state.
    pub fn save(&mut self, record: &SessionRecord) {
        if let Err(e) = self.write_session(record) {
            log::warn!("Session not saved: {}", e);
        }

        let Some(shared) = SharedSelection::from_record(record) else {
            return;
        };
        match shared.to_json() {
            Ok(json) => self.navigation.replace_query_data(&json),
            Err(e) => log::warn!("Share link not updated: {}", e),
        }
    }
}
