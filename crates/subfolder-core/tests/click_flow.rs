//! End-to-end flows over the in-memory tree: clicks through the interpreter
//! and oracle, and a keyboard walk through the navigation engine.

use subfolder_core::HostError;
use subfolder_core::host::{self, ClickRegion, Command, TreeClick, TreeNode, TreeView};
use subfolder_core::interpreter::{self, ClickInterpreter, ClickOutcome};
use subfolder_core::mode::{Mode, Notice};
use subfolder_core::nav::{NavEffect, NavKey, NavigationEngine};
use subfolder_core::oracle;
use subfolder_core::settings::Settings;
use subfolder_core::testing::{FakeOracle, MemRow, MemRowId, MemoryStore, MemoryTree};

fn tree() -> MemoryTree {
    MemoryTree::new(vec![vec![
        MemRow::new("Notebook", 0).expanded(),
        MemRow::new("Listed", 1).id("listed").collapsed(),
        MemRow::new("Listed child", 2).id("listed-1"),
        MemRow::new("Folder icon", 1).id("emoji").icon("📁").collapsed(),
        MemRow::new("Folder child", 2).id("emoji-1"),
        MemRow::new("Plain", 1).id("plain").collapsed(),
        MemRow::new("Plain child", 2).id("plain-1"),
        MemRow::new("Leaf", 1).id("leaf"),
    ]])
}

fn click_on(tree: &MemoryTree, node_id: &str, region: ClickRegion) -> TreeClick<MemRowId> {
    let row = tree.find_by_id(node_id).expect("row exists");
    TreeClick {
        node: tree.node(&row),
        row,
        region,
        is_replay: false,
    }
}

/// What the plugin does with one click, minus the DOM.
async fn handle(
    interpreter: &mut ClickInterpreter,
    tree: &MemoryTree,
    oracle: &FakeOracle,
    store: &mut MemoryStore,
    click: TreeClick<MemRowId>,
) -> Option<Notice> {
    let outcome = interpreter.interpret(&click);
    let notice = outcome.notice();
    match outcome {
        ClickOutcome::PassThrough => {}
        ClickOutcome::Intercept(command) => host::execute(tree, &command),
        ClickOutcome::Toggled { .. } => interpreter.settings().persist_ids(store),
        ClickOutcome::AwaitOracle { row, node_id } => {
            let command = oracle::resolve(oracle, row, &node_id).await;
            host::execute(tree, &command);
        }
    }
    if let Some(node_id) = interpreter::diagnosed_id(&click) {
        let _ = host::diagnose(tree, node_id);
    }
    notice
}

fn settings(ids: &[&str], emojis: &[&str], match_emojis: bool) -> Settings {
    Settings {
        ids: ids.iter().copied().collect(),
        emojis: emojis.iter().copied().collect(),
        match_emojis,
        ..Settings::default()
    }
}

#[tokio::test]
async fn listed_id_expands_without_asking_oracle() {
    let tree = tree();
    let oracle = FakeOracle::answering(false, false);
    let mut store = MemoryStore::default();
    let mut interpreter = ClickInterpreter::new(settings(&["listed"], &[], false));

    let click = click_on(&tree, "listed", ClickRegion::Row);
    let row = click.row;
    handle(&mut interpreter, &tree, &oracle, &mut store, click).await;

    assert_eq!(oracle.calls(), 0);
    assert_eq!(tree.commands(), vec![Command::Expand(row)]);
    assert!(tree.node(&row).is_expanded);
}

#[tokio::test]
async fn emoji_marker_expands() {
    let tree = tree();
    let oracle = FakeOracle::answering(false, false);
    let mut store = MemoryStore::default();
    let mut interpreter = ClickInterpreter::new(settings(&[], &["📁"], true));

    let click = click_on(&tree, "emoji", ClickRegion::Row);
    let row = click.row;
    handle(&mut interpreter, &tree, &oracle, &mut store, click).await;

    assert_eq!(oracle.calls(), 0);
    assert_eq!(tree.commands(), vec![Command::Expand(row)]);
}

#[tokio::test]
async fn empty_document_with_children_expands() {
    let tree = tree();
    let oracle = FakeOracle::answering(true, true);
    let mut store = MemoryStore::default();
    let mut interpreter = ClickInterpreter::new(settings(&[], &[], true));

    let click = click_on(&tree, "plain", ClickRegion::Row);
    let row = click.row;
    handle(&mut interpreter, &tree, &oracle, &mut store, click).await;

    assert_eq!(oracle.calls(), 1);
    assert_eq!(tree.commands(), vec![Command::Expand(row)]);
}

#[tokio::test]
async fn document_with_content_opens_once() {
    let tree = tree();
    let oracle = FakeOracle::answering(false, true);
    let mut store = MemoryStore::default();
    let mut interpreter = ClickInterpreter::new(settings(&[], &[], true));

    let click = click_on(&tree, "plain", ClickRegion::Row);
    let row = click.row;
    handle(&mut interpreter, &tree, &oracle, &mut store, click).await;

    assert_eq!(tree.commands(), vec![Command::OpenDefault(row)]);

    // The replayed click comes back tagged and is left alone.
    let mut replay = click_on(&tree, "plain", ClickRegion::Row);
    replay.is_replay = true;
    handle(&mut interpreter, &tree, &oracle, &mut store, replay).await;
    assert_eq!(tree.commands().len(), 1);
    assert_eq!(oracle.calls(), 1);
}

#[tokio::test]
async fn auto_mode_off_never_queries() {
    let tree = tree();
    let oracle = FakeOracle::answering(true, true);
    let mut store = MemoryStore::default();
    let mut interpreter = ClickInterpreter::new(Settings {
        auto_detect: false,
        ..Settings::default()
    });

    let click = click_on(&tree, "plain", ClickRegion::Row);
    handle(&mut interpreter, &tree, &oracle, &mut store, click).await;

    assert_eq!(oracle.calls(), 0);
    assert!(tree.commands().is_empty());
}

#[tokio::test]
async fn capture_round_trip_persists_each_toggle() {
    let tree = tree();
    let oracle = FakeOracle::answering(true, true);
    let mut store = MemoryStore::default();
    let mut interpreter = ClickInterpreter::new(Settings::default());
    interpreter.switch_mode(Mode::Capture);

    let added = handle(&mut interpreter, &tree, &oracle, &mut store, click_on(&tree, "leaf", ClickRegion::Row))
        .await
        .unwrap();
    assert!(added.text.contains("considered as subfolder"));
    assert_eq!(Settings::load(&store).ids, settings(&["leaf"], &[], true).ids);

    let removed = handle(&mut interpreter, &tree, &oracle, &mut store, click_on(&tree, "leaf", ClickRegion::Row))
        .await
        .unwrap();
    assert!(removed.text.contains("recovered"));
    assert!(Settings::load(&store).ids.is_empty());
    assert_eq!(store.saves(), 2);

    // Capture never opens or expands anything.
    assert!(tree.commands().is_empty());
    assert_eq!(oracle.calls(), 0);
}

#[tokio::test]
async fn captured_id_takes_effect_back_in_normal_mode() {
    let tree = tree();
    let oracle = FakeOracle::answering(false, false);
    let mut store = MemoryStore::default();
    let mut interpreter = ClickInterpreter::new(Settings::default());

    interpreter.switch_mode(Mode::Capture);
    handle(&mut interpreter, &tree, &oracle, &mut store, click_on(&tree, "plain", ClickRegion::Row)).await;
    interpreter.switch_mode(Mode::Normal);

    let click = click_on(&tree, "plain", ClickRegion::Row);
    let row = click.row;
    handle(&mut interpreter, &tree, &oracle, &mut store, click).await;
    assert_eq!(tree.commands(), vec![Command::Expand(row)]);
    assert_eq!(oracle.calls(), 0);
}

#[tokio::test]
async fn row_without_id_is_left_to_the_host() {
    let tree = tree();
    let oracle = FakeOracle::answering(true, true);
    let mut store = MemoryStore::default();
    let mut interpreter = ClickInterpreter::new(settings(&[], &["📁"], true));

    let row = tree.find_by_id("emoji").expect("row exists");
    let click = TreeClick {
        node: TreeNode {
            node_id: None,
            icon_text: "📁".to_string(),
            ..tree.node(&row)
        },
        row,
        region: ClickRegion::Row,
        is_replay: false,
    };
    handle(&mut interpreter, &tree, &oracle, &mut store, click).await;

    assert!(tree.commands().is_empty());
    assert_eq!(oracle.calls(), 0);
}

#[tokio::test]
async fn reveal_click_on_a_removed_row_reports_it_missing() {
    let mut tree = tree();
    let mut interpreter = ClickInterpreter::new(Settings::default());
    interpreter.switch_mode(Mode::Reveal);

    let click = click_on(&tree, "plain", ClickRegion::Row);
    tree.remove("plain");

    assert_eq!(interpreter.interpret(&click), ClickOutcome::PassThrough);
    let node_id = interpreter::diagnosed_id(&click).expect("click carries an id");
    assert_eq!(
        host::diagnose(&tree, node_id),
        Err(HostError::RowNotFound("plain".to_string()))
    );
    assert!(tree.commands().is_empty());
}

/// Apply navigation effects the way the plugin does, minus rendering.
fn apply(tree: &MemoryTree, effects: &[NavEffect<MemRowId>]) {
    for effect in effects {
        if let NavEffect::Run(command) = effect {
            host::execute(tree, command);
        }
    }
}

#[test]
fn keyboard_walk_expands_then_opens() {
    let tree = tree();
    let mut engine = NavigationEngine::new();

    apply(&tree, &engine.activate(&tree));
    apply(&tree, &engine.key(NavKey::Letter('a'), &tree));
    let names: Vec<_> = engine.entries().iter().map(|e| e.node.display_name.as_str()).collect();
    assert_eq!(names, vec!["Listed", "Folder icon", "Plain", "Leaf"]);

    // "Plain" is collapsed: expand, then rescan when the timer fires.
    let effects = engine.key(NavKey::Letter('c'), &tree);
    apply(&tree, &effects);
    let (task, token) = effects
        .iter()
        .find_map(|e| match e {
            NavEffect::Schedule { task, token, .. } => Some((*task, *token)),
            _ => None,
        })
        .expect("rescan scheduled");
    apply(&tree, &engine.on_timer(task, token, &tree));

    let cursor = engine.cursor().unwrap();
    assert_eq!(cursor.path(), ["Notebook".to_string(), "Plain".to_string()]);
    assert_eq!(engine.entries().len(), 1);
    assert_eq!(engine.entries()[0].node.level, 2);

    apply(&tree, &engine.key(NavKey::Letter('a'), &tree));
    assert!(!engine.is_active());
    let child = tree.find_by_id("plain-1").unwrap();
    assert_eq!(tree.commands().last(), Some(&Command::OpenDefault(child)));
}
