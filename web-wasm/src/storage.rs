//! Ranuras de sesión del navegador
//!
//! `vi.auth` en localStorage, `vi.currentOI` en sessionStorage.

use gloo::storage::{LocalStorage, SessionStorage, Storage};
use vi_common::{Error, KeyValueStore, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserStore {
    Local,
    Session,
}

impl BrowserStore {
    fn raw(&self) -> web_sys::Storage {
        match self {
            BrowserStore::Local => LocalStorage::raw(),
            BrowserStore::Session => SessionStorage::raw(),
        }
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        self.raw().get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> vi_common::Result<()> {
        self.raw()
            .set_item(key, value)
            .map_err(|e| Error::Storage(format!("{:?}", e)))
    }

    fn remove(&self, key: &str) {
        if let Err(e) = self.raw().remove_item(key) {
            gloo::console::warn!(format!("No se pudo borrar {}: {:?}", key, e));
        }
    }
}

pub fn session() -> Session<BrowserStore> {
    Session::new(BrowserStore::Local, BrowserStore::Session)
}

/// URL del backend: `<meta name="vi-api-url" content="...">` o la de siempre
pub fn api_base_url() -> String {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.query_selector("meta[name=\"vi-api-url\"]").ok().flatten())
        .and_then(|meta| meta.get_attribute("content"))
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| vi_common::DEFAULT_API_URL.to_string())
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_remove_clears_slot_and_tolerates_missing_key() {
        let store = BrowserStore::Session;
        store.set("vi.test", "{}").expect("set");
        assert_eq!(store.get("vi.test").as_deref(), Some("{}"));

        store.remove("vi.test");
        assert_eq!(store.get("vi.test"), None);
        store.remove("vi.test");
    }
}
