//! End-to-end workflows across the store and its façades

use blockforge_common::{Block, BlockType};
use blockforge_editor::{
    Clipboard, DocumentStore, DragSession, InlineEditor, MemoryClipboard, SelectionMode,
};
use serde_json::json;
use std::collections::HashSet;

fn page() -> DocumentStore {
    DocumentStore::from_blocks(vec![
        Block::new("hero", BlockType::Hero, "centered")
            .with_setting("title", "Spring sale")
            .with_setting("backgroundColor", "#fff"),
        Block::new("grid", BlockType::ProductGrid, "four-up"),
        Block::new("footer", BlockType::Footer, "columns"),
    ])
}

#[test]
fn test_inline_edit_is_one_undo_step() {
    let mut store = page();
    let mut editor = InlineEditor::new();
    store.change_block_variant("grid", "three-up");

    editor
        .start_edit(&mut store, "hero", "settings.title", json!("Spring sale"))
        .unwrap();
    for value in ["S", "Su", "Sum", "Summer sale"] {
        editor.update_value(&mut store, json!(value));
    }
    editor.end_edit(&mut store, true);
    assert_eq!(store.history_len(), 2);

    store.undo();
    assert_eq!(store.block("hero").unwrap().settings["title"], json!("Spring sale"));
    assert_eq!(store.block("grid").unwrap().variant, "three-up");

    store.redo();
    assert_eq!(store.block("hero").unwrap().settings["title"], json!("Summer sale"));
}

#[test]
fn test_clipboard_round_trip_preserves_content() {
    let mut store = page();
    let mut clipboard = Clipboard::new();
    let mut system = MemoryClipboard::default();

    store.select_block(Some("hero"), SelectionMode::Replace);
    clipboard.copy(&store, &mut system);
    let pasted = clipboard.paste(&mut store, &mut system).unwrap();

    let original = store.block("hero").unwrap().clone();
    let copy = store.block(&pasted).unwrap();
    assert_ne!(copy.id, original.id);
    assert_eq!(copy.block_type, original.block_type);
    assert_eq!(copy.variant, original.variant);
    assert_eq!(copy.settings, original.settings);
    assert_eq!(copy.visible, original.visible);
}

#[test]
fn test_repeated_paste_yields_distinct_copies() {
    let mut store = page();
    let mut clipboard = Clipboard::new();
    let mut system = MemoryClipboard::default();

    store.select_block(Some("hero"), SelectionMode::Replace);
    clipboard.copy(&store, &mut system);
    let original = store.block("hero").unwrap().clone();

    let pasted: Vec<String> = (0..5)
        .map(|_| clipboard.paste(&mut store, &mut system).unwrap())
        .collect();

    let unique: HashSet<&String> = pasted.iter().collect();
    assert_eq!(unique.len(), 5);
    assert!(!pasted.contains(&original.id));
    for id in &pasted {
        let copy = store.block(id).unwrap();
        assert_eq!(copy.block_type, original.block_type);
        assert_eq!(copy.variant, original.variant);
        assert_eq!(copy.settings, original.settings);
        assert_eq!(copy.visible, original.visible);
    }
    assert_eq!(store.blocks().len(), 8);
    assert_eq!(store.history_len(), 5);
}

#[test]
fn test_cancelled_drag_changes_nothing() {
    let mut store = page();
    let before = store.blocks().to_vec();
    let mut drag = DragSession::new();

    drag.set_active_drag_id(Some("hero"));
    drag.set_over_block_id(Some("footer"));
    drag.cancel();

    assert_eq!(store.blocks(), before.as_slice());
    assert!(!store.can_undo());
    assert!(!drag.drop(&mut store));
}

#[test]
fn test_paste_after_deleted_selection_appends() {
    let mut store = page();
    let mut clipboard = Clipboard::new();
    let mut system = MemoryClipboard::default();

    store.select_block(Some("grid"), SelectionMode::Replace);
    clipboard.copy(&store, &mut system);
    store.remove_block("grid");

    let pasted = clipboard.paste(&mut store, &mut system).unwrap();
    assert_eq!(store.blocks().last().unwrap().id, pasted);
}

#[test]
fn test_style_paste_then_undo() {
    let mut store = page();
    store.copy_block_styles("hero");
    store.paste_block_styles("footer");
    assert_eq!(store.block("footer").unwrap().settings["backgroundColor"], json!("#fff"));

    store.undo();
    assert!(store.block("footer").unwrap().settings.get("backgroundColor").is_none());
}
