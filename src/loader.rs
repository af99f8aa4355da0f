//! Game data loading
//!
//! The `game` and `settings` documents are fetched once and cached in the
//! session record; later page loads read them back from storage.

use std::future::Future;

use crate::catalog::Catalog;
use crate::error::{LoadError, PersistError};
use crate::persistence::session::SessionRecord;
use crate::persistence::{NavigationPort, PersistenceBridge, StoragePort};
use crate::settings::GameSettings;

pub const GAME_DOCUMENT: &str = "game";
pub const SETTINGS_DOCUMENT: &str = "settings";

/// Where the documents are served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataEndpoint {
    /// Config server: `<base>/api/<name>`
    Api { base: String },
    /// Static hosting: `<base>/json/<name>.json`
    Static { base: String },
}

impl Default for DataEndpoint {
    fn default() -> Self {
        DataEndpoint::Api {
            base: String::new(),
        }
    }
}

impl DataEndpoint {
    pub fn url(&self, name: &str) -> String {
        match self {
            DataEndpoint::Api { base } => format!("{}/api/{}", base.trim_end_matches('/'), name),
            DataEndpoint::Static { base } => {
                format!("{}/json/{}.json", base.trim_end_matches('/'), name)
            }
        }
    }
}

/// Both loaded documents
#[derive(Debug, Clone, PartialEq)]
pub struct GameData {
    pub catalog: Catalog,
    pub settings: GameSettings,
}

impl GameData {
    pub fn from_json(game: &str, settings: &str) -> Result<Self, LoadError> {
        Ok(Self {
            catalog: Catalog::from_json(game)?,
            settings: serde_json::from_str(settings)?,
        })
    }

    /// Cached copy from a session record, if both documents are present and valid
    pub fn from_session(record: &SessionRecord) -> Option<Self> {
        let game = record.game.clone()?;
        let settings = record.settings.clone()?;
        let parsed = Catalog::from_value(game).and_then(|catalog| {
            Ok(Self {
                catalog,
                settings: serde_json::from_value(settings)?,
            })
        });
        match parsed {
            Ok(data) => Some(data),
            Err(e) => {
                log::warn!("Cached game data unusable, refetching: {}", e);
                None
            }
        }
    }

    /// Session patch caching both documents
    pub fn to_record(&self) -> Result<SessionRecord, PersistError> {
        Ok(SessionRecord {
            game: Some(serde_json::to_value(&self.catalog)?),
            settings: Some(serde_json::to_value(&self.settings)?),
            ..SessionRecord::default()
        })
    }
}

/// Load from the session cache, or fetch both documents and cache them.
/// Any failure is logged and yields `None` (placeholder table).
pub async fn load_with<S, N, F, Fut>(
    bridge: &mut PersistenceBridge<S, N>,
    endpoint: &DataEndpoint,
    fetch: F,
) -> Option<GameData>
where
    S: StoragePort,
    N: NavigationPort,
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<String, LoadError>>,
{
    if let Some(data) = GameData::from_session(&bridge.read_session()) {
        log::info!("Game data loaded from session cache");
        return Some(data);
    }

    let fetched = async {
        let game = fetch(endpoint.url(GAME_DOCUMENT)).await?;
        let settings = fetch(endpoint.url(SETTINGS_DOCUMENT)).await?;
        GameData::from_json(&game, &settings)
    }
    .await;

    let data = match fetched {
        Ok(data) => data,
        Err(e) => {
            log::error!("Failed to load game data: {}", e);
            return None;
        }
    };
    log::info!("Fetched {} elements", data.catalog.len());

    match data.to_record() {
        Ok(record) => {
            if let Err(e) = bridge.write_session(&record) {
                log::warn!("Game data not cached: {}", e);
            }
        }
        Err(e) => log::warn!("Game data not cached: {}", e),
    }
    Some(data)
}

/// GET `url` and return the body text
#[cfg(target_arch = "wasm32")]
pub async fn fetch_text(url: String) -> Result<String, LoadError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let fail = |e: wasm_bindgen::JsValue| LoadError::Fetch {
        url: url.clone(),
        reason: format!("{:?}", e),
    };

    let window = web_sys::window().ok_or_else(|| LoadError::Fetch {
        url: url.clone(),
        reason: "no window".into(),
    })?;
    let response: web_sys::Response = JsFuture::from(window.fetch_with_str(&url))
        .await
        .map_err(fail)?
        .dyn_into()
        .map_err(fail)?;
    if !response.ok() {
        return Err(LoadError::Status {
            url,
            status: response.status(),
        });
    }
    let text = JsFuture::from(response.text().map_err(fail)?)
        .await
        .map_err(fail)?;
    text.as_string().ok_or_else(|| LoadError::Fetch {
        url,
        reason: "body is not text".into(),
    })
}
