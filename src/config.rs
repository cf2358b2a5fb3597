//! Plugin configuration.
//!
//! Centralizes the host-specific constants: DOM selectors of the document
//! tree, RPC endpoints, and timing for network calls. Core timing and
//! layout constants live in `subfolder_core::config`.

// =============================================================================
// Application Metadata
// =============================================================================

/// Plugin name used in log prefixes.
pub const PLUGIN_NAME: &str = "subfolder";

// =============================================================================
// Document Tree Selectors
// =============================================================================

/// Selectors for the host's file tree.
pub mod tree {
    /// Tree lists. There is one per dock the tree is shown in.
    pub const CONTAINER: &str = ".b3-list--background";
    /// Document rows, the only rows a click is interpreted on.
    pub const CLICK_ROW: &str = r#"li[data-type="navigation-file"]"#;
    /// Document rows plus notebook roots, in document order for scans.
    pub const SCAN_ROW: &str =
        r#"li[data-type="navigation-file"], li[data-type="navigation-root"]"#;
    /// Attribute carrying the document id.
    pub const NODE_ID_ATTR: &str = "data-node-id";
    /// Display name element within a row.
    pub const NAME: &str = ".b3-list-item__text";
    /// Icon element within a row.
    pub const ICON: &str = ".b3-list-item__icon";
    /// Expand/collapse affordance within a row.
    pub const TOGGLE: &str = ".b3-list-item__toggle";
    /// Disclosure arrow within the toggle.
    pub const ARROW: &str = ".b3-list-item__arrow";
    /// Class on the arrow while the row is expanded.
    pub const ARROW_OPEN_CLASS: &str = "b3-list-item__arrow--open";
    /// Class the host puts on a toggle with nothing to expand.
    pub const HIDDEN_CLASS: &str = "fn__hidden";
    /// "More" menu affordance; clicks there are never intercepted.
    pub const ACTION_MENU: &str = ".b3-list-item__action";
}

// =============================================================================
// Event Tagging
// =============================================================================

/// Property set on events the plugin dispatches itself.
pub const REPLAY_MARKER: &str = "__subfolderReplay";

// =============================================================================
// Host RPC
// =============================================================================

/// Host RPC endpoints (relative to the page origin).
pub mod rpc {
    /// Document statistics, including the character count.
    pub const TREE_STAT: &str = "/api/block/getTreeStat";
    /// Read-only SQL over the block index.
    pub const QUERY_SQL: &str = "/api/query/sql";
}

/// RPC request timeout in milliseconds.
pub const RPC_TIMEOUT_MS: i32 = 5000;

// =============================================================================
// Top Bar
// =============================================================================

/// Top-bar buttons registered at start.
pub mod buttons {
    use subfolder_core::Mode;

    /// Icon markup and tooltip per mode button.
    pub const MODES: [(Mode, &str, &str); 3] = [
        (Mode::Normal, "iconFolder", "Subfolder: normal mode"),
        (Mode::Capture, "iconSelect", "Subfolder: capture mode"),
        (Mode::Reveal, "iconFile", "Subfolder: reveal mode"),
    ];

    /// Keyboard navigation toggle.
    pub const NAVIGATION: (&str, &str) = ("iconKeymap", "Subfolder: keyboard navigation");

    /// Background of the active mode button.
    pub const ACTIVE_BACKGROUND: &str = "var(--b3-theme-primary-lightest)";
    /// Foreground of the active mode button.
    pub const ACTIVE_COLOR: &str = "var(--b3-theme-primary)";
}
