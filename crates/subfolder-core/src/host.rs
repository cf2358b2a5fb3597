//! Seams between the core and the host's document tree.
//!
//! The core never reaches into host internals. It reads rows through
//! [`TreeView`] and acts on them only by issuing one of the two
//! [`Command`]s through [`TreeActions`]. The adapter is responsible for
//! tagging the synthetic events it dispatches so that its own click
//! listener does not intercept them again.

use crate::config::INDENT_PER_LEVEL_PX;
use crate::error::HostError;

// ============================================================================
// Row Projection
// ============================================================================

/// State of a row's expand/collapse affordance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Toggle {
    /// No toggle element at all.
    #[default]
    Absent,
    /// Toggle exists but is hidden (no children).
    Hidden,
    Collapsed,
    Expanded,
}

/// Raw attributes of a rendered row, as read from the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowView {
    pub node_id: Option<String>,
    pub display_name: String,
    /// Left padding of the toggle, in pixels.
    pub indent_px: Option<f64>,
    pub toggle: Toggle,
    pub icon_text: String,
}

/// Read-only projection of one tree row.
///
/// Derived from the live tree on every use and never cached, since the
/// host may re-render at any time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeNode {
    pub node_id: Option<String>,
    pub display_name: String,
    pub level: usize,
    pub has_children: bool,
    pub is_expanded: bool,
    pub icon_text: String,
}

impl From<RowView> for TreeNode {
    fn from(view: RowView) -> Self {
        Self {
            node_id: view.node_id.filter(|id| !id.is_empty()),
            display_name: view.display_name.trim().to_string(),
            level: level_from_indent(view.indent_px.unwrap_or(0.0)),
            has_children: matches!(view.toggle, Toggle::Collapsed | Toggle::Expanded),
            is_expanded: view.toggle == Toggle::Expanded,
            icon_text: view.icon_text.trim().to_string(),
        }
    }
}

/// Infer a row's depth from its indent.
pub fn level_from_indent(indent_px: f64) -> usize {
    if !indent_px.is_finite() || indent_px <= 0.0 {
        return 0;
    }
    (indent_px / INDENT_PER_LEVEL_PX).floor() as usize
}

// ============================================================================
// Adapter Traits
// ============================================================================

/// Read access to the rendered tree.
pub trait TreeView {
    /// Handle to a rendered row. Equality is element identity.
    type Row: Clone + PartialEq;

    /// Rows of every tree container, each in document order.
    fn containers(&self) -> Vec<Vec<Self::Row>>;

    fn row_view(&self, row: &Self::Row) -> RowView;

    /// Whether the row has a non-empty rendering box.
    fn is_visible(&self, row: &Self::Row) -> bool;

    fn find_by_id(&self, node_id: &str) -> Option<Self::Row>;

    fn node(&self, row: &Self::Row) -> TreeNode {
        self.row_view(row).into()
    }
}

/// What the core asks the host to do with a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<R> {
    /// Activate the row's toggle so the host expands or collapses it.
    Expand(R),
    /// Replay a click on the row so the host opens the document.
    OpenDefault(R),
}

impl<R> Command<R> {
    pub fn row(&self) -> &R {
        match self {
            Self::Expand(row) | Self::OpenDefault(row) => row,
        }
    }
}

/// Simulated input at host-owned controls.
pub trait TreeActions {
    type Row;

    /// Dispatch a replay-tagged activation at the row's toggle.
    fn expand(&self, row: &Self::Row) -> Result<(), HostError>;

    /// Dispatch a replay-tagged click at the row itself.
    fn open(&self, row: &Self::Row) -> Result<(), HostError>;
}

/// Carry out a command, downgrading failures to warnings.
pub fn execute<A: TreeActions>(host: &A, command: &Command<A::Row>) {
    let result = match command {
        Command::Expand(row) => host.expand(row),
        Command::OpenDefault(row) => host.open(row),
    };
    if let Err(e) = result {
        log::warn!("command not executed: {e}");
    }
}

/// Confirm the clicked node is still rendered. Observability only.
pub fn diagnose<V: TreeView>(tree: &V, node_id: &str) -> Result<(), HostError> {
    match tree.find_by_id(node_id) {
        Some(_) => Ok(()),
        None => {
            let err = HostError::RowNotFound(node_id.to_string());
            log::warn!("{err}");
            Err(err)
        }
    }
}

// ============================================================================
// Clicks
// ============================================================================

/// Which part of a row received the click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickRegion {
    /// The row body (name, padding, counters).
    Row,
    Toggle,
    Icon,
    /// The "more" menu; never intercepted.
    ActionMenu,
}

impl ClickRegion {
    /// Toggle and icon clicks keep the host's native behavior.
    pub fn is_special(self) -> bool {
        matches!(self, Self::Toggle | Self::Icon)
    }
}

/// A click that landed on a tree row.
#[derive(Debug, Clone)]
pub struct TreeClick<R> {
    pub row: R,
    pub node: TreeNode,
    pub region: ClickRegion,
    /// Set on events the plugin dispatched itself.
    pub is_replay: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_indent() {
        assert_eq!(level_from_indent(0.0), 0);
        assert_eq!(level_from_indent(17.9), 0);
        assert_eq!(level_from_indent(18.0), 1);
        assert_eq!(level_from_indent(44.0), 2);
        assert_eq!(level_from_indent(-18.0), 0);
        assert_eq!(level_from_indent(f64::NAN), 0);
    }

    #[test]
    fn test_node_from_row_view() {
        let node: TreeNode = RowView {
            node_id: Some("20240101120000-abcdefg".to_string()),
            display_name: " Projects ".to_string(),
            indent_px: Some(36.0),
            toggle: Toggle::Expanded,
            icon_text: "📁\n".to_string(),
        }
        .into();

        assert_eq!(node.node_id.as_deref(), Some("20240101120000-abcdefg"));
        assert_eq!(node.display_name, "Projects");
        assert_eq!(node.level, 2);
        assert!(node.has_children);
        assert!(node.is_expanded);
        assert_eq!(node.icon_text, "📁");
    }

    #[test]
    fn test_hidden_toggle_means_no_children() {
        let node: TreeNode = RowView {
            toggle: Toggle::Hidden,
            ..RowView::default()
        }
        .into();
        assert!(!node.has_children);
        assert!(!node.is_expanded);
        assert_eq!(node.level, 0);
    }

    #[test]
    fn test_empty_id_is_absent() {
        let node: TreeNode = RowView {
            node_id: Some(String::new()),
            ..RowView::default()
        }
        .into();
        assert!(node.node_id.is_none());
    }

    #[test]
    fn test_special_regions() {
        assert!(ClickRegion::Toggle.is_special());
        assert!(ClickRegion::Icon.is_special());
        assert!(!ClickRegion::Row.is_special());
        assert!(!ClickRegion::ActionMenu.is_special());
    }
}
