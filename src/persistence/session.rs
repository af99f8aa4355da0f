//! Persisted session record and the shareable URL payload

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::Language;
use crate::error::PersistError;
use crate::layout::TableSize;
use crate::settings::{Difficulty, DifficultyConfig, Gamemode};

/// Everything kept under the session storage key.
///
/// All fields are optional: a record is also used as a patch, and a stored
/// record may come from an older build. Keys this type does not know are
/// left untouched on write.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Cached element catalog document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<Value>,
    /// Cached difficulty settings document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
    #[serde(rename = "darkmode", skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_size: Option<TableSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gamemode: Option<Gamemode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<DifficultyConfig>,
}

impl SessionRecord {
    /// Lenient parse: a malformed field is dropped, not the whole record
    pub fn parse(json: &str) -> Self {
        let map = match serde_json::from_str::<Value>(json) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                log::warn!("Stored session is not an object, ignoring");
                return Self::default();
            }
            Err(e) => {
                log::warn!("Stored session is not valid JSON: {}", e);
                return Self::default();
            }
        };

        Self {
            game: map.get("game").filter(|v| !v.is_null()).cloned(),
            settings: map.get("settings").filter(|v| !v.is_null()).cloned(),
            dark_mode: field(&map, "darkmode"),
            table_size: field(&map, "tableSize"),
            language: field(&map, "language"),
            difficulty: field(&map, "difficulty"),
            gamemode: field(&map, "gamemode"),
            config: field(&map, "config"),
        }
    }

    /// Overlay this record onto `existing` JSON, keeping every key it does
    /// not set. Garbage in `existing` is replaced.
    pub fn merge_into(&self, existing: Option<&str>) -> Result<String, PersistError> {
        let mut map = existing
            .and_then(|json| serde_json::from_str::<Value>(json).ok())
            .and_then(|v| match v {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .unwrap_or_default();

        if let Value::Object(patch) = serde_json::to_value(self)? {
            map.extend(patch);
        }
        Ok(serde_json::to_string(&Value::Object(map))?)
    }
}

fn field<T: DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Option<T> {
    let value = map.get(key)?;
    match serde_json::from_value(value.clone()) {
        Ok(v) => Some(v),
        Err(e) => {
            if !value.is_null() {
                log::warn!("Ignoring stored {}: {}", key, e);
            }
            None
        }
    }
}

/// Gameplay selection carried in the `data` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SharedSelection {
    pub difficulty: Difficulty,
    pub gamemode: Gamemode,
    pub config: DifficultyConfig,
}

impl SharedSelection {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// The shareable subset of a record, if it holds all three fields
    pub fn from_record(record: &SessionRecord) -> Option<Self> {
        Some(Self {
            difficulty: record.difficulty?,
            gamemode: record.gamemode?,
            config: record.config?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_good_fields() {
        let json = r#"{
            "difficulty": "nightmare",
            "gamemode": "arcade",
            "language": "ptBR",
            "darkmode": true,
            "tableSize": 3,
            "time": 42
        }"#;
        let record = SessionRecord::parse(json);
        assert_eq!(record.difficulty, None);
        assert_eq!(record.gamemode, Some(Gamemode::Arcade));
        assert_eq!(record.language, Some(Language::PtBr));
        assert_eq!(record.dark_mode, Some(true));
        assert_eq!(record.table_size, Some(TableSize::new(3)));
        assert!(record.config.is_none());
    }

    #[test]
    fn test_parse_drops_oversized_table_size() {
        let record = SessionRecord::parse(r#"{"tableSize":12,"darkmode":true}"#);
        assert_eq!(record.table_size, None);
        assert_eq!(record.dark_mode, Some(true));
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(SessionRecord::parse("not json"), SessionRecord::default());
        assert_eq!(SessionRecord::parse("[1,2]"), SessionRecord::default());
    }

    #[test]
    fn test_merge_preserves_unknown_keys() {
        let existing = r#"{"game":[1],"time":42,"language":"esES"}"#;
        let patch = SessionRecord {
            language: Some(Language::EnUs),
            dark_mode: Some(false),
            ..SessionRecord::default()
        };
        let merged: Value = serde_json::from_str(&patch.merge_into(Some(existing)).unwrap()).unwrap();
        assert_eq!(merged["game"], serde_json::json!([1]));
        assert_eq!(merged["time"], 42);
        assert_eq!(merged["language"], "enUS");
        assert_eq!(merged["darkmode"], false);
    }

    #[test]
    fn test_merge_over_garbage() {
        let patch = SessionRecord {
            gamemode: Some(Gamemode::Classic),
            ..SessionRecord::default()
        };
        let merged = patch.merge_into(Some("}{")).unwrap();
        assert_eq!(merged, r#"{"gamemode":"classic"}"#);
    }

    #[test]
    fn test_shared_selection_needs_all_fields() {
        let mut record = SessionRecord {
            difficulty: Some(Difficulty::Hard),
            gamemode: Some(Gamemode::Arcade),
            ..SessionRecord::default()
        };
        assert!(SharedSelection::from_record(&record).is_none());

        record.config = Some(DifficultyConfig::default());
        let shared = SharedSelection::from_record(&record).unwrap();
        let back = SharedSelection::from_json(&shared.to_json().unwrap()).unwrap();
        assert_eq!(back, shared);
    }
}
