//! Bindings to the host plugin API.
//!
//! The host shim passes one `HostApi` object to the plugin constructor. It
//! exposes the settings store, notifications, the top bar, and the runtime
//! environment.

use js_sys::{Function, Promise};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::HtmlElement;

use subfolder_core::{Notice, SettingItem, SettingsStore};

use crate::error::describe;

#[wasm_bindgen]
extern "C" {
    /// The host API object handed to the plugin.
    #[derive(Debug, Clone)]
    pub type HostApi;

    #[wasm_bindgen(method, js_name = getSetting)]
    fn get_setting(this: &HostApi, key: &str) -> JsValue;

    #[wasm_bindgen(method, js_name = setSetting)]
    fn set_setting(this: &HostApi, key: &str, value: JsValue);

    #[wasm_bindgen(method, js_name = saveSettings)]
    fn save_settings(this: &HostApi) -> Promise;

    #[wasm_bindgen(method, js_name = loadSettings)]
    fn load_settings(this: &HostApi) -> Promise;

    #[wasm_bindgen(method, js_name = registerSetting)]
    fn register_setting(this: &HostApi, item: JsValue);

    #[wasm_bindgen(method, js_name = showMessage)]
    fn show_message(this: &HostApi, text: &str, timeout_ms: u32);

    #[wasm_bindgen(method, js_name = addTopBarButton)]
    pub fn add_top_bar_button(
        this: &HostApi,
        icon: &str,
        title: &str,
        callback: &Function,
    ) -> HtmlElement;

    #[wasm_bindgen(method, getter)]
    pub fn frontend(this: &HostApi) -> String;

    #[wasm_bindgen(method, getter)]
    pub fn backend(this: &HostApi) -> String;
}

/// Convert to a plain JS value (objects, not `Map`s).
fn to_js<T: Serialize>(value: &T) -> Option<JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| log::warn!("serialization failed: {e}"))
        .ok()
}

impl HostApi {
    /// Show a transient message.
    pub fn notify(&self, notice: &Notice) {
        self.show_message(&notice.text, notice.duration_ms);
    }

    /// Reload persisted settings into the host store.
    pub async fn reload(&self) {
        if let Err(e) = JsFuture::from(self.load_settings()).await {
            log::warn!("loading settings failed: {}", describe(&e));
        }
    }

    /// Register the settings panel entries.
    pub fn register_settings(&self, items: &[SettingItem]) {
        for item in items {
            if let Some(value) = to_js(item) {
                self.register_setting(value);
            }
        }
    }
}

// =============================================================================
// Settings Store
// =============================================================================

/// [`SettingsStore`] over the host's key-value settings.
///
/// Saves are fire-and-forget: failures are logged, never retried.
#[derive(Debug)]
pub struct HostSettings<'a> {
    host: &'a HostApi,
}

impl<'a> HostSettings<'a> {
    pub fn new(host: &'a HostApi) -> Self {
        Self { host }
    }
}

impl SettingsStore for HostSettings<'_> {
    fn get(&self, key: &str) -> Option<Value> {
        let raw = self.host.get_setting(key);
        if raw.is_undefined() || raw.is_null() {
            return None;
        }
        serde_wasm_bindgen::from_value(raw)
            .map_err(|e| log::warn!("setting {key} unreadable: {e}"))
            .ok()
    }

    fn set(&mut self, key: &str, value: Value) {
        if let Some(value) = to_js(&value) {
            self.host.set_setting(key, value);
        }
    }

    fn save(&mut self) {
        let promise = self.host.save_settings();
        spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::warn!("saving settings failed: {}", describe(&e));
            }
        });
    }
}
