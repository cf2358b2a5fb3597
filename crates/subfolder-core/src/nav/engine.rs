//! The keyboard navigation state machine.

use crate::config::{EXPAND_SETTLE_MS, KEY_SEQUENCE_TIMEOUT_MS};
use crate::host::{Command, TreeView};

use super::keys::{KeySequenceMap, NavKey, SequenceMatch};
use super::scan::{Anchor, NavigationCursor, ScanEntry, scan};
use super::timer::{TimerSlot, TimerToken};

/// Deferred work the engine can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavTask {
    /// Discard a partial key sequence.
    SequenceExpiry,
    /// Rescan after the host finished expanding a row.
    Rescan,
}

/// Side effects for the adapter to perform, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum NavEffect<R> {
    /// Show or redraw the overlay.
    Render(OverlayModel),
    /// Update only the partial-sequence indicator.
    Indicator(String),
    Hide,
    ListenKeys,
    UnlistenKeys,
    /// Call [`NavigationEngine::on_timer`] with `token` after `delay_ms`,
    /// replacing any pending timer for the same task.
    Schedule {
        task: NavTask,
        token: TimerToken,
        delay_ms: u32,
    },
    Cancel(NavTask),
    Run(Command<R>),
}

/// One line of the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayEntry {
    pub code: String,
    pub name: String,
    pub icon: String,
    pub has_children: bool,
    pub is_expanded: bool,
}

/// Everything the overlay displays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayModel {
    pub path: Vec<String>,
    pub entries: Vec<OverlayEntry>,
    pub sequence: String,
    /// Waiting for the host to finish expanding.
    pub loading: bool,
}

#[derive(Debug)]
struct Session<R> {
    cursor: NavigationCursor<R>,
    entries: Vec<ScanEntry<R>>,
    keys: KeySequenceMap,
    sequence: String,
    sequence_timer: TimerSlot,
    rescan_timer: TimerSlot,
}

impl<R: Clone + PartialEq> Session<R> {
    fn new() -> Self {
        Self {
            cursor: NavigationCursor::root(),
            entries: Vec::new(),
            keys: KeySequenceMap::default(),
            sequence: String::new(),
            sequence_timer: TimerSlot::new(),
            rescan_timer: TimerSlot::new(),
        }
    }

    fn rescan<V: TreeView<Row = R>>(&mut self, tree: &V) {
        self.entries = scan(tree, &self.cursor);
        self.keys = KeySequenceMap::for_len(self.entries.len());
        log::debug!(
            "scanned {} entries at level {}",
            self.entries.len(),
            self.cursor.level()
        );
    }

    fn clear_entries(&mut self) {
        self.entries.clear();
        self.keys = KeySequenceMap::default();
    }

    fn model(&self) -> OverlayModel {
        OverlayModel {
            path: self.cursor.path().to_vec(),
            entries: self
                .entries
                .iter()
                .enumerate()
                .map(|(i, entry)| OverlayEntry {
                    code: self.keys.code(i).unwrap_or_default().to_string(),
                    name: entry.node.display_name.clone(),
                    icon: entry.node.icon_text.clone(),
                    has_children: entry.node.has_children,
                    is_expanded: entry.node.is_expanded,
                })
                .collect(),
            sequence: self.sequence.clone(),
            loading: self.rescan_timer.is_armed(),
        }
    }
}

/// Modal keyboard navigation over the host tree.
///
/// Inactive until [`activate`](Self::activate). While active, every key
/// press goes through [`key`](Self::key). All methods return the effects
/// the adapter must perform; the engine itself never touches the host.
#[derive(Debug)]
pub struct NavigationEngine<R> {
    session: Option<Session<R>>,
}

impl<R> Default for NavigationEngine<R> {
    fn default() -> Self {
        Self { session: None }
    }
}

impl<R: Clone + PartialEq> NavigationEngine<R> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn cursor(&self) -> Option<&NavigationCursor<R>> {
        self.session.as_ref().map(|s| &s.cursor)
    }

    pub fn entries(&self) -> &[ScanEntry<R>] {
        self.session.as_ref().map_or(&[], |s| s.entries.as_slice())
    }

    pub fn sequence(&self) -> &str {
        self.session.as_ref().map_or("", |s| s.sequence.as_str())
    }

    pub fn activate<V: TreeView<Row = R>>(&mut self, tree: &V) -> Vec<NavEffect<R>> {
        if self.session.is_some() {
            return Vec::new();
        }
        let mut session = Session::new();
        session.rescan(tree);
        let model = session.model();
        self.session = Some(session);
        vec![NavEffect::Render(model), NavEffect::ListenKeys]
    }

    pub fn deactivate(&mut self) -> Vec<NavEffect<R>> {
        if self.session.take().is_none() {
            return Vec::new();
        }
        vec![
            NavEffect::Cancel(NavTask::SequenceExpiry),
            NavEffect::Cancel(NavTask::Rescan),
            NavEffect::Hide,
            NavEffect::UnlistenKeys,
        ]
    }

    pub fn key<V: TreeView<Row = R>>(&mut self, key: NavKey, tree: &V) -> Vec<NavEffect<R>> {
        if self.session.is_none() {
            return Vec::new();
        }
        match key {
            NavKey::Escape => self.deactivate(),
            NavKey::Backspace => self.ascend(tree),
            NavKey::Letter(c) => self.letter(c, tree),
            NavKey::Other => Vec::new(),
        }
    }

    /// A scheduled timer fired. Stale tokens are ignored.
    pub fn on_timer<V: TreeView<Row = R>>(
        &mut self,
        task: NavTask,
        token: TimerToken,
        tree: &V,
    ) -> Vec<NavEffect<R>> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        match task {
            NavTask::SequenceExpiry if session.sequence_timer.fire(token) => {
                session.sequence.clear();
                vec![NavEffect::Indicator(String::new())]
            }
            NavTask::Rescan if session.rescan_timer.fire(token) => {
                session.rescan(tree);
                vec![NavEffect::Render(session.model())]
            }
            _ => Vec::new(),
        }
    }

    fn letter<V: TreeView<Row = R>>(&mut self, c: char, tree: &V) -> Vec<NavEffect<R>> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        let mut effects = Vec::new();
        if session.sequence_timer.is_armed() {
            session.sequence_timer.cancel();
            effects.push(NavEffect::Cancel(NavTask::SequenceExpiry));
        }
        session.sequence.push(c);

        match session.keys.lookup(&session.sequence) {
            SequenceMatch::Exact(index) => {
                session.sequence.clear();
                effects.extend(self.select(index, tree));
            }
            SequenceMatch::Prefix => {
                let token = session.sequence_timer.arm();
                effects.push(NavEffect::Schedule {
                    task: NavTask::SequenceExpiry,
                    token,
                    delay_ms: KEY_SEQUENCE_TIMEOUT_MS,
                });
                effects.push(NavEffect::Indicator(session.sequence.clone()));
            }
            SequenceMatch::Dead => {
                session.sequence.clear();
                effects.push(NavEffect::Indicator(String::new()));
            }
        }
        effects
    }

    fn select<V: TreeView<Row = R>>(&mut self, index: usize, tree: &V) -> Vec<NavEffect<R>> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        let Some(entry) = session.entries.get(index).cloned() else {
            return Vec::new();
        };

        if !entry.node.has_children {
            let mut effects = self.deactivate();
            effects.push(NavEffect::Run(Command::OpenDefault(entry.row)));
            return effects;
        }

        session.cursor.drill_in(
            entry.node.display_name.clone(),
            Anchor {
                row: entry.row.clone(),
                node_id: entry.node.node_id.clone(),
            },
        );

        if entry.node.is_expanded {
            session.rescan(tree);
            return vec![NavEffect::Render(session.model())];
        }

        session.clear_entries();
        let token = session.rescan_timer.arm();
        vec![
            NavEffect::Run(Command::Expand(entry.row)),
            NavEffect::Schedule {
                task: NavTask::Rescan,
                token,
                delay_ms: EXPAND_SETTLE_MS,
            },
            NavEffect::Render(session.model()),
        ]
    }

    fn ascend<V: TreeView<Row = R>>(&mut self, tree: &V) -> Vec<NavEffect<R>> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        if !session.cursor.ascend() {
            return Vec::new();
        }
        let mut effects = Vec::new();
        if session.rescan_timer.is_armed() {
            session.rescan_timer.cancel();
            effects.push(NavEffect::Cancel(NavTask::Rescan));
        }
        session.rescan(tree);
        effects.push(NavEffect::Render(session.model()));
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemRow, MemRowId, MemoryTree};

    fn tree() -> MemoryTree {
        MemoryTree::new(vec![vec![
            MemRow::new("Notebook", 0).expanded(),
            MemRow::new("Projects", 1).id("p").expanded(),
            MemRow::new("Alpha", 2).id("p1"),
            MemRow::new("Archive", 1).id("a").collapsed(),
            MemRow::new("Old", 2).id("a1"),
            MemRow::new("Readme", 1).id("r"),
        ]])
    }

    fn rendered(effects: &[NavEffect<MemRowId>]) -> Option<&OverlayModel> {
        effects.iter().rev().find_map(|e| match e {
            NavEffect::Render(model) => Some(model),
            _ => None,
        })
    }

    fn scheduled(effects: &[NavEffect<MemRowId>], task: NavTask) -> Option<TimerToken> {
        effects.iter().find_map(|e| match e {
            NavEffect::Schedule { task: t, token, .. } if *t == task => Some(*token),
            _ => None,
        })
    }

    fn entry_names(engine: &NavigationEngine<MemRowId>) -> Vec<String> {
        engine.entries().iter().map(|e| e.node.display_name.clone()).collect()
    }

    #[test]
    fn test_activate_renders_root_and_listens() {
        let tree = tree();
        let mut engine = NavigationEngine::new();
        let effects = engine.activate(&tree);

        assert!(engine.is_active());
        assert!(effects.contains(&NavEffect::ListenKeys));
        let model = rendered(&effects).unwrap();
        assert!(model.path.is_empty());
        assert_eq!(model.entries[0].code, "a");
        assert_eq!(model.entries[0].name, "Notebook");
    }

    #[test]
    fn test_activate_and_deactivate_are_reentrant_safe() {
        let tree = tree();
        let mut engine = NavigationEngine::new();
        engine.activate(&tree);
        assert!(engine.activate(&tree).is_empty());

        let effects = engine.deactivate();
        assert!(effects.contains(&NavEffect::Hide));
        assert!(effects.contains(&NavEffect::UnlistenKeys));
        assert!(engine.deactivate().is_empty());
        assert!(!engine.is_active());
    }

    #[test]
    fn test_keys_ignored_while_inactive() {
        let tree = tree();
        let mut engine = NavigationEngine::new();
        assert!(engine.key(NavKey::Letter('a'), &tree).is_empty());
        assert!(engine.key(NavKey::Escape, &tree).is_empty());
    }

    #[test]
    fn test_drill_into_expanded_rescans_immediately() {
        let tree = tree();
        let mut engine = NavigationEngine::new();
        engine.activate(&tree);

        let effects = engine.key(NavKey::Letter('a'), &tree);
        let model = rendered(&effects).unwrap();
        assert_eq!(model.path, vec!["Notebook".to_string()]);
        assert_eq!(entry_names(&engine), vec!["Projects", "Archive", "Readme"]);
        assert_eq!(engine.cursor().unwrap().level(), 1);
        assert!(tree.commands().is_empty());
    }

    #[test]
    fn test_drill_into_collapsed_expands_then_rescans() {
        let tree = tree();
        let mut engine = NavigationEngine::new();
        engine.activate(&tree);
        engine.key(NavKey::Letter('a'), &tree);

        let effects = engine.key(NavKey::Letter('b'), &tree);
        let archive = tree.find_by_id("a").unwrap();
        assert!(effects.contains(&NavEffect::Run(Command::Expand(archive))));
        assert!(rendered(&effects).unwrap().loading);
        assert!(engine.entries().is_empty());

        let token = scheduled(&effects, NavTask::Rescan).unwrap();
        crate::host::execute(&tree, &Command::Expand(archive));
        let effects = engine.on_timer(NavTask::Rescan, token, &tree);
        let model = rendered(&effects).unwrap();
        assert!(!model.loading);
        assert_eq!(entry_names(&engine), vec!["Old"]);
        assert_eq!(model.path, vec!["Notebook".to_string(), "Archive".to_string()]);
    }

    #[test]
    fn test_leaf_selection_opens_and_deactivates() {
        let tree = tree();
        let mut engine = NavigationEngine::new();
        engine.activate(&tree);
        engine.key(NavKey::Letter('a'), &tree);

        let effects = engine.key(NavKey::Letter('c'), &tree);
        let readme = tree.find_by_id("r").unwrap();
        assert!(effects.contains(&NavEffect::Hide));
        assert_eq!(effects.last(), Some(&NavEffect::Run(Command::OpenDefault(readme))));
        assert!(!engine.is_active());
    }

    #[test]
    fn test_dead_key_resets_sequence() {
        let tree = tree();
        let mut engine = NavigationEngine::new();
        engine.activate(&tree);

        let effects = engine.key(NavKey::Letter('q'), &tree);
        assert_eq!(effects, vec![NavEffect::Indicator(String::new())]);
        assert_eq!(engine.sequence(), "");
        assert!(engine.is_active());
    }

    #[test]
    fn test_backspace_ascends_and_stops_at_root() {
        let tree = tree();
        let mut engine = NavigationEngine::new();
        engine.activate(&tree);
        engine.key(NavKey::Letter('a'), &tree);
        engine.key(NavKey::Letter('a'), &tree);
        assert_eq!(engine.cursor().unwrap().level(), 2);

        engine.key(NavKey::Backspace, &tree);
        assert_eq!(engine.cursor().unwrap().level(), 1);
        assert_eq!(entry_names(&engine), vec!["Projects", "Archive", "Readme"]);

        engine.key(NavKey::Backspace, &tree);
        assert_eq!(engine.cursor().unwrap().level(), 0);
        assert!(engine.key(NavKey::Backspace, &tree).is_empty());
        assert_eq!(engine.cursor().unwrap().level(), 0);
    }

    #[test]
    fn test_ascend_cancels_pending_rescan() {
        let tree = tree();
        let mut engine = NavigationEngine::new();
        engine.activate(&tree);
        engine.key(NavKey::Letter('a'), &tree);
        let effects = engine.key(NavKey::Letter('b'), &tree);
        let token = scheduled(&effects, NavTask::Rescan).unwrap();

        let effects = engine.key(NavKey::Backspace, &tree);
        assert!(effects.contains(&NavEffect::Cancel(NavTask::Rescan)));
        assert!(engine.on_timer(NavTask::Rescan, token, &tree).is_empty());
        assert_eq!(entry_names(&engine), vec!["Projects", "Archive", "Readme"]);
    }

    #[test]
    fn test_escape_deactivates() {
        let tree = tree();
        let mut engine = NavigationEngine::new();
        engine.activate(&tree);
        let effects = engine.key(NavKey::Escape, &tree);
        assert!(effects.contains(&NavEffect::Hide));
        assert!(!engine.is_active());
    }

    #[test]
    fn test_other_keys_ignored() {
        let tree = tree();
        let mut engine = NavigationEngine::new();
        engine.activate(&tree);
        assert!(engine.key(NavKey::Other, &tree).is_empty());
        assert!(engine.is_active());
    }

    fn wide_tree(children: usize) -> MemoryTree {
        let mut rows = vec![MemRow::new("Root", 0).expanded()];
        rows.extend((0..children).map(|i| MemRow::new(&format!("Doc {i}"), 1).id(&format!("d{i}"))));
        MemoryTree::new(vec![rows])
    }

    #[test]
    fn test_single_letter_wins_over_longer_codes() {
        let tree = wide_tree(30);
        let mut engine = NavigationEngine::new();
        engine.activate(&tree);
        engine.key(NavKey::Letter('a'), &tree);
        assert_eq!(engine.entries().len(), 30);

        let effects = engine.key(NavKey::Letter('a'), &tree);
        let first = tree.find_by_id("d0").unwrap();
        assert_eq!(effects.last(), Some(&NavEffect::Run(Command::OpenDefault(first))));
    }

    #[test]
    fn test_sequence_expiry_clears_partial_sequence() {
        let tree = wide_tree(3);
        let mut engine = NavigationEngine::new();
        engine.activate(&tree);
        engine.key(NavKey::Letter('a'), &tree);

        engine.session.as_mut().unwrap().keys =
            KeySequenceMap::from_codes(vec!["xa".to_string(), "xb".to_string()]);

        let effects = engine.key(NavKey::Letter('x'), &tree);
        let token = scheduled(&effects, NavTask::SequenceExpiry).unwrap();
        assert!(effects.contains(&NavEffect::Indicator("x".to_string())));
        assert_eq!(engine.sequence(), "x");

        let effects = engine.on_timer(NavTask::SequenceExpiry, token, &tree);
        assert_eq!(effects, vec![NavEffect::Indicator(String::new())]);
        assert_eq!(engine.sequence(), "");
        assert!(engine.on_timer(NavTask::SequenceExpiry, token, &tree).is_empty());
    }

    #[test]
    fn test_new_letter_cancels_pending_expiry() {
        let tree = wide_tree(3);
        let mut engine = NavigationEngine::new();
        engine.activate(&tree);
        engine.key(NavKey::Letter('a'), &tree);
        engine.session.as_mut().unwrap().keys =
            KeySequenceMap::from_codes(vec!["xya".to_string()]);

        let first = engine.key(NavKey::Letter('x'), &tree);
        let stale = scheduled(&first, NavTask::SequenceExpiry).unwrap();
        let second = engine.key(NavKey::Letter('y'), &tree);
        assert_eq!(second[0], NavEffect::Cancel(NavTask::SequenceExpiry));
        assert_eq!(engine.sequence(), "xy");
        assert!(engine.on_timer(NavTask::SequenceExpiry, stale, &tree).is_empty());
        assert_eq!(engine.sequence(), "xy");
    }
}
