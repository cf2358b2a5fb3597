//! In-memory test doubles for the host seams.
//!
//! Available to unit tests and, through the `mock` feature, to integration
//! tests and dependent crates.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use serde_json::Value;

use crate::config::INDENT_PER_LEVEL_PX;
use crate::error::{HostError, OracleError};
use crate::host::{Command, RowView, Toggle, TreeActions, TreeView};
use crate::oracle::{DocStatus, EmptinessOracle};
use crate::settings::SettingsStore;

// ============================================================================
// MemoryTree
// ============================================================================

/// Handle to a row of a [`MemoryTree`].
///
/// Handles from before a [`MemoryTree::rerender`] no longer match any row,
/// like element references after the host rebuilds its DOM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemRowId {
    generation: u32,
    container: usize,
    index: usize,
}

/// One row of a [`MemoryTree`].
#[derive(Debug, Clone)]
pub struct MemRow {
    node_id: Option<String>,
    name: String,
    level: usize,
    toggle: Toggle,
    icon: String,
    hidden: bool,
    visible: bool,
}

impl MemRow {
    /// A leaf row: its toggle is rendered but hidden.
    pub fn new(name: &str, level: usize) -> Self {
        Self {
            node_id: None,
            name: name.to_string(),
            level,
            toggle: Toggle::Hidden,
            icon: String::new(),
            hidden: false,
            visible: true,
        }
    }

    pub fn id(mut self, node_id: &str) -> Self {
        self.node_id = Some(node_id.to_string());
        self
    }

    pub fn icon(mut self, icon: &str) -> Self {
        self.icon = icon.to_string();
        self
    }

    pub fn expanded(mut self) -> Self {
        self.toggle = Toggle::Expanded;
        self
    }

    pub fn collapsed(mut self) -> Self {
        self.toggle = Toggle::Collapsed;
        self
    }

    pub fn without_toggle(mut self) -> Self {
        self.toggle = Toggle::Absent;
        self
    }

    /// Rendered but not visible, whatever its ancestors.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

#[derive(Debug)]
struct TreeState {
    containers: Vec<Vec<MemRow>>,
    generation: u32,
}

impl TreeState {
    /// A row is visible when it is not hidden and every ancestor is expanded.
    fn refresh_visibility(&mut self) {
        for rows in &mut self.containers {
            let mut ancestors: Vec<(usize, bool)> = Vec::new();
            for row in rows.iter_mut() {
                while ancestors.last().is_some_and(|(level, _)| *level >= row.level) {
                    ancestors.pop();
                }
                row.visible = !row.hidden && ancestors.iter().all(|(_, open)| *open);
                ancestors.push((row.level, row.toggle == Toggle::Expanded));
            }
        }
    }

    fn get(&self, id: &MemRowId) -> Option<&MemRow> {
        if id.generation != self.generation {
            return None;
        }
        self.containers.get(id.container)?.get(id.index)
    }

    fn get_mut(&mut self, id: &MemRowId) -> Option<&mut MemRow> {
        if id.generation != self.generation {
            return None;
        }
        self.containers.get_mut(id.container)?.get_mut(id.index)
    }
}

/// A document tree held in memory, standing in for the host DOM.
///
/// Expanding a row flips its toggle and reveals its children. Every command
/// the core issues is recorded for inspection.
#[derive(Debug)]
pub struct MemoryTree {
    state: RefCell<TreeState>,
    commands: RefCell<Vec<Command<MemRowId>>>,
}

impl MemoryTree {
    pub fn new(containers: Vec<Vec<MemRow>>) -> Self {
        let mut state = TreeState {
            containers,
            generation: 0,
        };
        state.refresh_visibility();
        Self {
            state: RefCell::new(state),
            commands: RefCell::new(Vec::new()),
        }
    }

    pub fn row_at(&self, container: usize, index: usize) -> MemRowId {
        MemRowId {
            generation: self.state.borrow().generation,
            container,
            index,
        }
    }

    pub fn contains(&self, id: &MemRowId) -> bool {
        self.state.borrow().get(id).is_some()
    }

    /// Rebuild every row, invalidating all handles.
    pub fn rerender(&mut self) {
        self.state.get_mut().generation += 1;
    }

    /// Rebuild without the rows carrying `node_id`.
    pub fn remove(&mut self, node_id: &str) {
        let state = self.state.get_mut();
        for rows in &mut state.containers {
            rows.retain(|row| row.node_id.as_deref() != Some(node_id));
        }
        state.generation += 1;
        state.refresh_visibility();
    }

    pub fn commands(&self) -> Vec<Command<MemRowId>> {
        self.commands.borrow().clone()
    }
}

impl TreeView for MemoryTree {
    type Row = MemRowId;

    fn containers(&self) -> Vec<Vec<MemRowId>> {
        let state = self.state.borrow();
        state
            .containers
            .iter()
            .enumerate()
            .map(|(container, rows)| {
                (0..rows.len())
                    .map(|index| MemRowId {
                        generation: state.generation,
                        container,
                        index,
                    })
                    .collect()
            })
            .collect()
    }

    fn row_view(&self, row: &MemRowId) -> RowView {
        let state = self.state.borrow();
        let Some(row) = state.get(row) else {
            return RowView::default();
        };
        RowView {
            node_id: row.node_id.clone(),
            display_name: row.name.clone(),
            indent_px: Some(row.level as f64 * INDENT_PER_LEVEL_PX),
            toggle: row.toggle,
            icon_text: row.icon.clone(),
        }
    }

    fn is_visible(&self, row: &MemRowId) -> bool {
        self.state.borrow().get(row).is_some_and(|r| r.visible)
    }

    fn find_by_id(&self, node_id: &str) -> Option<MemRowId> {
        self.containers()
            .into_iter()
            .flatten()
            .find(|row| self.row_view(row).node_id.as_deref() == Some(node_id))
    }
}

impl TreeActions for MemoryTree {
    type Row = MemRowId;

    fn expand(&self, row: &MemRowId) -> Result<(), HostError> {
        let mut state = self.state.borrow_mut();
        let target = state
            .get_mut(row)
            .ok_or_else(|| HostError::RowNotFound(format!("{row:?}")))?;
        target.toggle = match target.toggle {
            Toggle::Absent => return Err(HostError::MissingToggle),
            Toggle::Hidden => Toggle::Hidden,
            Toggle::Collapsed => Toggle::Expanded,
            Toggle::Expanded => Toggle::Collapsed,
        };
        state.refresh_visibility();
        self.commands.borrow_mut().push(Command::Expand(*row));
        Ok(())
    }

    fn open(&self, row: &MemRowId) -> Result<(), HostError> {
        if !self.contains(row) {
            return Err(HostError::RowNotFound(format!("{row:?}")));
        }
        self.commands.borrow_mut().push(Command::OpenDefault(*row));
        Ok(())
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

/// Settings store backed by a map, counting saves.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
    saves: usize,
}

impl MemoryStore {
    pub fn with<'a>(entries: impl IntoIterator<Item = (&'a str, Value)>) -> Self {
        Self {
            values: entries
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
            saves: 0,
        }
    }

    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    fn save(&mut self) {
        self.saves += 1;
    }
}

// ============================================================================
// FakeOracle
// ============================================================================

/// Oracle with a fixed answer that counts how often it was asked.
#[derive(Debug)]
pub struct FakeOracle {
    answer: Result<DocStatus, OracleError>,
    calls: Cell<usize>,
}

impl FakeOracle {
    pub fn answering(is_empty: bool, has_children: bool) -> Self {
        Self {
            answer: Ok(DocStatus {
                is_empty,
                has_children,
            }),
            calls: Cell::new(0),
        }
    }

    pub fn failing(error: OracleError) -> Self {
        Self {
            answer: Err(error),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl EmptinessOracle for FakeOracle {
    async fn inspect(&self, _node_id: &str) -> Result<DocStatus, OracleError> {
        self.calls.set(self.calls.get() + 1);
        self.answer.clone()
    }
}
