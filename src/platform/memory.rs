//! In-memory ports

use std::collections::HashMap;

use crate::error::PersistError;
use crate::persistence::{DocumentPort, NavigationPort, StoragePort};

/// HashMap-backed storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStorage {
    /// Storage that rejects every write, like a full quota
    pub fn read_only() -> Self {
        Self {
            items: HashMap::new(),
            read_only: true,
        }
    }
}

impl StoragePort for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        if self.read_only {
            return Err(PersistError::Storage("quota exceeded".into()));
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Holds the decoded `data` parameter
#[derive(Debug, Clone, Default)]
pub struct MemoryNavigation {
    data: Option<String>,
    /// How many times the URL was replaced
    pub replacements: usize,
}

impl MemoryNavigation {
    pub fn with_data(data: &str) -> Self {
        Self {
            data: Some(data.to_string()),
            replacements: 0,
        }
    }
}

impl NavigationPort for MemoryNavigation {
    fn query_data(&self) -> Option<String> {
        self.data.clone()
    }

    fn replace_query_data(&mut self, data: &str) {
        self.data = Some(data.to_string());
        self.replacements += 1;
    }
}

/// Records the applied theme
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    pub prefers_dark: bool,
    pub dark_mode: bool,
    pub width: f64,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self {
            prefers_dark: false,
            dark_mode: false,
            width: 1280.0,
        }
    }
}

impl DocumentPort for MemoryDocument {
    fn prefers_dark(&self) -> bool {
        self.prefers_dark
    }

    fn apply_dark_mode(&mut self, enabled: bool) {
        self.dark_mode = enabled;
    }

    fn viewport_width(&self) -> f64 {
        self.width
    }
}
