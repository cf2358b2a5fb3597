//! Core configuration constants.
//!
//! Timing and layout values shared by the interpreter and the navigation
//! engine. Host-specific selectors live in the plugin crate.

// =============================================================================
// Tree Layout
// =============================================================================

/// Horizontal indent of one tree level, in CSS pixels.
pub const INDENT_PER_LEVEL_PX: f64 = 18.0;

// =============================================================================
// Keyboard Navigation
// =============================================================================

/// Idle time after which a partial key sequence is discarded.
pub const KEY_SEQUENCE_TIMEOUT_MS: u32 = 2000;

/// Delay between expanding a row and rescanning its children.
pub const EXPAND_SETTLE_MS: u32 = 200;

/// Alphabet used for key sequences.
pub const KEY_ALPHABET: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";

// =============================================================================
// Notices
// =============================================================================

/// Notice display durations (milliseconds).
pub mod notice {
    /// Default duration for mode and capture notices.
    pub const SHORT_MS: u32 = 2000;
    /// Capture mode carries longer instructions.
    pub const LONG_MS: u32 = 8000;
    /// Environment report request.
    pub const ENVIRONMENT_MS: u32 = 10000;
}

/// Number of switch calls before the Normal-mode notice is shown.
pub const NORMAL_NOTICE_AFTER_SWITCHES: u8 = 2;

// =============================================================================
// Setting Keys
// =============================================================================

/// Keys in the host settings store.
///
/// Names match what earlier releases persisted, so existing configurations
/// keep loading.
pub mod keys {
    pub const ENABLE_ID_MATCH: &str = "enable_using_id_as_subfolder_identify";
    pub const ENABLE_EMOJI_MATCH: &str = "enable_using_emoji_as_subfolder_identify";
    pub const ENABLE_AUTO_MODE: &str = "enable_auto_mode";
    pub const ENABLE_MODE_BUTTONS: &str = "enable_mode_switch_buttons";
    pub const ENABLE_KEYBOARD_NAVIGATION: &str = "enable_keyboard_navigation";
    pub const DEBUG_LOGGING: &str = "enable_debug_logging";
    pub const SUBFOLDER_IDS: &str = "ids_that_should_be_treated_as_subfolder";
    pub const SUBFOLDER_EMOJIS: &str = "emojies_that_should_be_treated_as_subfolder";
    pub const USAGE_HINT: &str = "Hint";
}

/// Marker emoji used until the user edits the list.
pub const DEFAULT_EMOJIS: &str = "🗃️,📂,📁";
