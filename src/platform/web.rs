//! Browser ports

use wasm_bindgen::JsValue;
use web_sys::UrlSearchParams;

use crate::consts::URL_PARAM;
use crate::error::PersistError;
use crate::persistence::{DocumentPort, NavigationPort, StoragePort};

/// `window.localStorage`
pub struct LocalStorage {
    storage: Option<web_sys::Storage>,
}

impl LocalStorage {
    pub fn open() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - progress will not be saved");
        }
        Self { storage }
    }
}

impl StoragePort for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| PersistError::Storage("LocalStorage unavailable".into()))?;
        storage
            .set_item(key, value)
            .map_err(|e| PersistError::Storage(format!("{:?}", e)))
    }
}

/// `window.location` + `window.history`
pub struct BrowserNavigation;

impl NavigationPort for BrowserNavigation {
    fn query_data(&self) -> Option<String> {
        let search = web_sys::window()?.location().search().ok()?;
        UrlSearchParams::new_with_str(&search).ok()?.get(URL_PARAM)
    }

    fn replace_query_data(&mut self, data: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let path = window.location().pathname().unwrap_or_default();
        let encoded = String::from(js_sys::encode_uri_component(data));
        let url = format!("{}?{}={}", path, URL_PARAM, encoded);
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&url));
        }
    }
}

/// Theme classes on `<body>`
pub struct BodyTheme;

impl DocumentPort for BodyTheme {
    fn prefers_dark(&self) -> bool {
        web_sys::window()
            .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
            .is_some_and(|mq| mq.matches())
    }

    fn apply_dark_mode(&mut self, enabled: bool) {
        let Some(body) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body())
        else {
            return;
        };
        let classes = body.class_list();
        if enabled {
            let _ = classes.remove_1("bg-white");
            let _ = classes.add_2("bg-zinc-800", "dark");
        } else {
            let _ = classes.remove_2("bg-zinc-800", "dark");
            let _ = classes.add_1("bg-white");
        }
    }

    fn viewport_width(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.inner_width().ok())
            .and_then(|v| v.as_f64())
            .unwrap_or(1280.0)
    }
}
