//! Level-scoped scans of the rendered tree.

use crate::host::{TreeNode, TreeView};

/// Reference to a row the cursor has drilled into.
///
/// The row handle is tried first. If the host re-rendered and the handle
/// is gone, the node id locates the replacement row.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor<R> {
    pub row: R,
    pub node_id: Option<String>,
}

/// Where the overlay currently is in the tree.
///
/// `path` and `anchors` always have the same length, so the level is the
/// path length and there is a scope anchor exactly when the level is
/// non-zero.
#[derive(Debug, Clone)]
pub struct NavigationCursor<R> {
    path: Vec<String>,
    anchors: Vec<Anchor<R>>,
}

impl<R> Default for NavigationCursor<R> {
    fn default() -> Self {
        Self {
            path: Vec::new(),
            anchors: Vec::new(),
        }
    }
}

impl<R> NavigationCursor<R> {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    #[inline]
    pub fn level(&self) -> usize {
        self.path.len()
    }

    pub fn scope_anchor(&self) -> Option<&Anchor<R>> {
        self.anchors.last()
    }

    pub fn drill_in(&mut self, name: String, anchor: Anchor<R>) {
        self.path.push(name);
        self.anchors.push(anchor);
    }

    /// Pop one level. Returns `false` at the root.
    pub fn ascend(&mut self) -> bool {
        if self.path.pop().is_some() {
            self.anchors.pop();
            true
        } else {
            false
        }
    }
}

/// One direct child of the current scope.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanEntry<R> {
    pub row: R,
    pub node: TreeNode,
    /// Display names from the root down to this entry.
    pub path: Vec<String>,
}

/// Collect the direct children of the cursor's scope, in document order.
pub fn scan<V: TreeView>(tree: &V, cursor: &NavigationCursor<V::Row>) -> Vec<ScanEntry<V::Row>> {
    let containers = tree.containers();
    let level = cursor.level();

    let Some(anchor) = cursor.scope_anchor() else {
        return containers
            .into_iter()
            .flatten()
            .filter(|row| tree.is_visible(row))
            .filter_map(|row| {
                let node = tree.node(&row);
                (node.level == 0).then(|| entry(row, node, cursor.path()))
            })
            .collect();
    };

    let anchor_row = resolve_anchor(tree, &containers, anchor);
    let Some(anchor_row) = anchor_row else {
        log::warn!("scope anchor {:?} is no longer rendered", cursor.path().last());
        return Vec::new();
    };

    let mut entries = Vec::new();
    for rows in containers {
        let mut inside = false;
        for row in rows {
            if !inside {
                inside = row == anchor_row;
                continue;
            }
            let node = tree.node(&row);
            // A shallower row closes the scope even when it is not rendered.
            if node.level < level {
                break;
            }
            if node.level == level && tree.is_visible(&row) {
                entries.push(entry(row, node, cursor.path()));
            }
        }
    }
    entries
}

fn resolve_anchor<V: TreeView>(
    tree: &V,
    containers: &[Vec<V::Row>],
    anchor: &Anchor<V::Row>,
) -> Option<V::Row> {
    if containers.iter().flatten().any(|row| *row == anchor.row) {
        return Some(anchor.row.clone());
    }
    let node_id = anchor.node_id.as_deref()?;
    log::debug!("anchor row replaced, resolving {node_id} by id");
    tree.find_by_id(node_id)
}

fn entry<R>(row: R, node: TreeNode, parent: &[String]) -> ScanEntry<R> {
    let mut path = parent.to_vec();
    path.push(node.display_name.clone());
    ScanEntry { row, node, path }
}
