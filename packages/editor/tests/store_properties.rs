//! Invariants that must hold after any sequence of store operations

use blockforge_common::{check_integrity, collect_ids, Block, BlockType, EditorConfig, IdGenerator};
use blockforge_editor::{DocumentStore, MoveDirection, SelectionMode};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

fn store_with(ids: &[&str]) -> DocumentStore {
    let mut store = DocumentStore::new().with_id_generator(IdGenerator::from_seed("test"));
    store.set_blocks(
        ids.iter()
            .map(|id| Block::new(*id, BlockType::RichText, "default"))
            .collect(),
    );
    store
}

fn top_ids(store: &DocumentStore) -> Vec<String> {
    store.blocks().iter().map(|b| b.id.clone()).collect()
}

/// Mixed workload touching every structural operation
fn churn(store: &mut DocumentStore) {
    store.add_block_by_type(BlockType::Section, None);
    let section = store.blocks().last().unwrap().id.clone();
    store.add_block_to_container(&section, Block::new("", BlockType::Video, "x"), None);
    store.move_block(0, 2);
    store.duplicate_block("b");
    store.select_blocks(&["a".to_string(), "c".to_string()]);
    store.duplicate_selected_blocks();
    store.move_selected_blocks(MoveDirection::Down);
    store.remove_block("a");
    store.duplicate_block(&section);
    store.move_block_to_container("c", Some(&section), Some(0));
    store.select_all();
    store.group_selected_blocks();
    store.remove_selected_blocks();
}

#[test]
fn test_order_contiguity_after_churn() {
    let mut store = store_with(&["a", "b", "c", "d"]);
    churn(&mut store);
    assert!(check_integrity(store.blocks()).is_empty());

    while store.undo() {
        assert!(check_integrity(store.blocks()).is_empty());
    }
}

#[test]
fn test_ids_stay_unique() {
    let mut store = store_with(&["a", "b", "c", "d"]);
    churn(&mut store);
    while store.undo() {}
    while store.redo() {}
    churn(&mut store);

    let ids = collect_ids(store.blocks());
    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(ids.len(), unique.len());
}

#[test]
fn test_undo_then_redo_round_trips() {
    let mut store = store_with(&["a", "b", "c"]);
    store.move_block(0, 2);
    store.toggle_block_visibility("b");
    let after = store.blocks().to_vec();

    assert!(store.undo());
    assert!(store.undo());
    assert_eq!(top_ids(&store), vec!["a", "b", "c"]);

    assert!(store.redo());
    assert!(store.redo());
    assert_eq!(store.blocks(), after.as_slice());
}

#[test]
fn test_new_mutation_clears_future() {
    let mut store = store_with(&["a", "b"]);
    store.move_block(0, 1);
    store.undo();
    assert!(store.can_redo());

    store.change_block_variant("a", "wide");
    assert!(!store.can_redo());
    assert_eq!(store.future_len(), 0);
}

#[test]
fn test_history_is_bounded() {
    let mut store = store_with(&["a"]);
    for _ in 0..60 {
        store.toggle_block_visibility("a");
    }
    assert_eq!(store.history_len(), 50);

    let config = EditorConfig {
        history_limit: 5,
        ..EditorConfig::default()
    };
    let mut small = DocumentStore::with_config(config);
    small.set_blocks(vec![Block::new("a", BlockType::Hero, "x")]);
    for _ in 0..10 {
        small.toggle_block_visibility("a");
    }
    assert_eq!(small.history_len(), 5);
}

#[test]
fn test_deleting_selected_block_clears_selection() {
    let mut store = store_with(&["a", "b"]);
    store.select_block(Some("a"), SelectionMode::Replace);
    store.remove_block("a");
    assert_eq!(store.selected_block_id(), None);
    assert!(store.selected_block_ids().is_empty());
}

#[test]
fn test_move_is_reversible() {
    let mut store = store_with(&["a", "b", "c", "d"]);
    store.move_block(1, 3);
    store.move_block(3, 1);
    assert_eq!(top_ids(&store), vec!["a", "b", "c", "d"]);
}

#[test]
fn test_simple_reorder_scenario() {
    let mut store = store_with(&["A", "B", "C"]);
    store.move_block(0, 2);

    assert_eq!(top_ids(&store), vec!["B", "C", "A"]);
    let orders: Vec<usize> = store.blocks().iter().map(|b| b.order).collect();
    assert_eq!(orders, vec![0, 1, 2]);
    assert_eq!(store.history_len(), 1);
    assert!(store.is_dirty());

    store.undo();
    assert_eq!(top_ids(&store), vec!["A", "B", "C"]);
    assert_eq!(store.future_len(), 1);
}

#[test]
fn test_duplicate_scenario() {
    let mut store = store_with(&["A", "B"]);
    let copy = store.duplicate_block("A").unwrap();

    let ids = top_ids(&store);
    assert_eq!(ids.len(), 3);
    assert_eq!(ids[0], "A");
    assert_eq!(ids[1], copy);
    assert_eq!(ids[2], "B");
    assert_eq!(store.selected_block_id(), Some(copy.as_str()));
    assert_eq!(
        store.block(&copy).unwrap().settings,
        store.block("A").unwrap().settings
    );
}

#[test]
fn test_duplicate_container_reidentifies_children() {
    let mut store = store_with(&[]);
    store.set_blocks(vec![Block::new("s", BlockType::Section, "x")
        .with_children(vec![Block::new("child", BlockType::Faq, "x")])]);

    let copy = store.duplicate_block("s").unwrap();
    let copied_child = &store.block(&copy).unwrap().children()[0];
    assert_ne!(copied_child.id, "child");
    assert_eq!(copied_child.parent_id.as_deref(), Some(copy.as_str()));
}

#[test]
fn test_subscribers_observe_each_mutation() {
    let mut store = store_with(&["a", "b"]);
    let revisions = Arc::new(Mutex::new(Vec::new()));
    let sink = revisions.clone();
    store.subscribe(move |snapshot| {
        sink.lock().unwrap().push((snapshot.revision, snapshot.is_dirty, snapshot.can_undo));
    });

    store.move_block(0, 1);
    store.move_block(5, 0);
    store.undo();

    let seen = revisions.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen[0].1 && seen[0].2);
    assert!(!seen[1].2);
    assert!(seen[1].0 > seen[0].0);
}
