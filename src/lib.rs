//! Subfolder plugin for the document tree sidebar.
//!
//! Makes documents behave as folders: clicking one expands it instead of
//! opening it when its id is listed, its icon is a marker emoji, or the
//! host reports it empty with children. Adds a capture mode for listing
//! documents by click and a keyboard overlay for walking the tree.
//!
//! The host shim constructs [`SubfolderPlugin`] with its API object, calls
//! [`start`](SubfolderPlugin::start) once the layout is ready, and
//! [`dispose`](SubfolderPlugin::dispose) on unload.

mod config;
mod dom;
mod error;
mod host;
mod logger;
mod oracle;
mod overlay;
mod plugin;
mod rpc;

use std::rc::Rc;

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use subfolder_core::Mode;

pub use host::HostApi;
use plugin::Plugin;

#[wasm_bindgen]
pub struct SubfolderPlugin {
    plugin: Rc<Plugin>,
}

#[wasm_bindgen]
impl SubfolderPlugin {
    #[wasm_bindgen(constructor)]
    pub fn new(host: HostApi) -> Result<SubfolderPlugin, JsError> {
        console_error_panic_hook::set_once();
        logger::init(false);
        let plugin = Plugin::new(host)?;
        Ok(Self { plugin })
    }

    /// Resolves once settings are loaded and listeners are attached.
    pub fn start(&self) -> Promise {
        let plugin = Rc::clone(&self.plugin);
        future_to_promise(async move {
            plugin
                .start()
                .await
                .map_err(|e| JsValue::from(JsError::from(e)))?;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Switch to `normal`, `capture`, or `reveal`. Returns `false` for any
    /// other name.
    #[wasm_bindgen(js_name = switchMode)]
    pub fn switch_mode(&self, name: &str) -> bool {
        let Some(mode) = Mode::from_name(name) else {
            log::warn!("unknown mode: {name}");
            return false;
        };
        self.plugin.switch_mode(mode);
        true
    }

    #[wasm_bindgen(js_name = toggleNavigation)]
    pub fn toggle_navigation(&self) {
        self.plugin.toggle_navigation();
    }

    /// Re-read settings after the user edited them.
    #[wasm_bindgen(js_name = reloadSettings)]
    pub fn reload_settings(&self) -> Promise {
        let plugin = Rc::clone(&self.plugin);
        future_to_promise(async move {
            plugin.reload_settings().await;
            Ok(JsValue::UNDEFINED)
        })
    }

    pub fn dispose(&self) {
        self.plugin.dispose();
    }
}
