//! Typed view over the host key-value settings store.
//!
//! The host owns persistence. This module only knows which keys exist,
//! their defaults, and how the two marker sets are written as text.

use serde::Serialize;
use serde_json::Value;

use crate::config::{DEFAULT_EMOJIS, keys};
use crate::identity::{MarkerSet, parse_set, serialize_set};

/// Host key-value store.
///
/// Writes are fire-and-forget: `save` may complete after the caller has
/// already moved on, and in-memory state is never rolled back.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value);
    fn save(&mut self);
}

/// Kind of control the host renders for a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingKind {
    Checkbox,
    Textarea,
    Hint,
}

/// One entry in the host's settings panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingItem {
    pub key: &'static str,
    pub value: Value,
    #[serde(rename = "type")]
    pub kind: SettingKind,
    pub title: &'static str,
    pub description: &'static str,
}

/// Runtime configuration of the plugin.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Treat rows whose id is in `ids` as subfolders.
    pub match_ids: bool,
    /// Treat rows whose icon is in `emojis` as subfolders.
    pub match_emojis: bool,
    /// Ask the oracle whether unlisted documents are empty containers.
    pub auto_detect: bool,
    /// Add the three mode buttons to the top bar.
    pub mode_buttons: bool,
    /// Add the keyboard navigation button to the top bar.
    pub keyboard_navigation: bool,
    pub debug_logging: bool,
    pub ids: MarkerSet,
    pub emojis: MarkerSet,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            match_ids: true,
            match_emojis: true,
            auto_detect: true,
            mode_buttons: true,
            keyboard_navigation: true,
            debug_logging: false,
            ids: MarkerSet::new(),
            emojis: parse_set(DEFAULT_EMOJIS),
        }
    }
}

impl Settings {
    /// Build settings from the store, falling back to defaults per key.
    ///
    /// Always produces a fresh value; callers replace their copy wholesale.
    pub fn load(store: &impl SettingsStore) -> Self {
        let defaults = Self::default();
        Self {
            match_ids: read_bool(store, keys::ENABLE_ID_MATCH, defaults.match_ids),
            match_emojis: read_bool(store, keys::ENABLE_EMOJI_MATCH, defaults.match_emojis),
            auto_detect: read_bool(store, keys::ENABLE_AUTO_MODE, defaults.auto_detect),
            mode_buttons: read_bool(store, keys::ENABLE_MODE_BUTTONS, defaults.mode_buttons),
            keyboard_navigation: read_bool(
                store,
                keys::ENABLE_KEYBOARD_NAVIGATION,
                defaults.keyboard_navigation,
            ),
            debug_logging: read_bool(store, keys::DEBUG_LOGGING, defaults.debug_logging),
            ids: read_set(store, keys::SUBFOLDER_IDS).unwrap_or(defaults.ids),
            emojis: read_set(store, keys::SUBFOLDER_EMOJIS).unwrap_or(defaults.emojis),
        }
    }

    /// Write the id set and save immediately.
    pub fn persist_ids(&self, store: &mut impl SettingsStore) {
        store.set(keys::SUBFOLDER_IDS, Value::String(serialize_set(&self.ids)));
        store.save();
    }

    /// Whether `icon_text` names one of the configured markers.
    pub fn is_marker(&self, icon_text: &str) -> bool {
        let icon = icon_text.trim();
        !icon.is_empty() && self.emojis.contains(icon)
    }

    /// Items to register with the host settings panel, carrying current values.
    pub fn items(&self) -> Vec<SettingItem> {
        vec![
            SettingItem {
                key: keys::USAGE_HINT,
                value: Value::Null,
                kind: SettingKind::Hint,
                title: "Usage",
                description: "Clicking a subfolder document expands its children instead of \
                              opening it. Use the capture button to mark or unmark documents.",
            },
            SettingItem {
                key: keys::ENABLE_ID_MATCH,
                value: Value::Bool(self.match_ids),
                kind: SettingKind::Checkbox,
                title: "Match by document id",
                description: "Documents listed below behave as subfolders.",
            },
            SettingItem {
                key: keys::SUBFOLDER_IDS,
                value: Value::String(serialize_set(&self.ids)),
                kind: SettingKind::Textarea,
                title: "Subfolder document ids",
                description: "Comma separated document ids.",
            },
            SettingItem {
                key: keys::ENABLE_EMOJI_MATCH,
                value: Value::Bool(self.match_emojis),
                kind: SettingKind::Checkbox,
                title: "Match by icon",
                description: "Documents whose icon is listed below behave as subfolders.",
            },
            SettingItem {
                key: keys::SUBFOLDER_EMOJIS,
                value: Value::String(serialize_set(&self.emojis)),
                kind: SettingKind::Textarea,
                title: "Subfolder icons",
                description: "Comma separated emoji.",
            },
            SettingItem {
                key: keys::ENABLE_AUTO_MODE,
                value: Value::Bool(self.auto_detect),
                kind: SettingKind::Checkbox,
                title: "Detect empty documents",
                description: "Documents with no content but with children behave as subfolders.",
            },
            SettingItem {
                key: keys::ENABLE_MODE_BUTTONS,
                value: Value::Bool(self.mode_buttons),
                kind: SettingKind::Checkbox,
                title: "Mode switch buttons",
                description: "Show the normal, capture and reveal buttons in the top bar. \
                              Takes effect after a reload.",
            },
            SettingItem {
                key: keys::ENABLE_KEYBOARD_NAVIGATION,
                value: Value::Bool(self.keyboard_navigation),
                kind: SettingKind::Checkbox,
                title: "Keyboard navigation",
                description: "Show the keyboard navigation button. Use a-z to pick an entry, \
                              then ab, ac and so on for longer lists.",
            },
            SettingItem {
                key: keys::DEBUG_LOGGING,
                value: Value::Bool(self.debug_logging),
                kind: SettingKind::Checkbox,
                title: "Debug logging",
                description: "Write decisions to the developer console.",
            },
        ]
    }
}

/// Booleans may come back from the host as JSON booleans or as strings.
fn read_bool(store: &impl SettingsStore, key: &str, default: bool) -> bool {
    match store.get(key) {
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => match s.trim() {
            "true" | "1" => true,
            "false" | "0" => false,
            _ => default,
        },
        _ => default,
    }
}

/// `None` when the key was never stored. An empty string is an empty set.
fn read_set(store: &impl SettingsStore, key: &str) -> Option<MarkerSet> {
    match store.get(key)? {
        Value::String(text) => Some(parse_set(&text)),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .collect(),
        ),
        _ => None,
    }
}
