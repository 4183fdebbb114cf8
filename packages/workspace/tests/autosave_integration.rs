//! Store edits driving the autosave coordinator through a DirtyWatcher

use blockforge_common::{AutosaveConfig, Block, BlockType};
use blockforge_editor::{DocumentStore, SelectionMode};
use blockforge_workspace::{save_callback, AutosaveCoordinator, AutosaveStatus, DirtyWatcher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn coordinator() -> (Arc<AtomicUsize>, AutosaveCoordinator) {
    let saves = Arc::new(AtomicUsize::new(0));
    let counter = saves.clone();
    let save = save_callback(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Ok(()) }
    });
    let autosave = AutosaveCoordinator::new(AutosaveConfig::default(), save).unwrap();
    (saves, autosave)
}

fn store() -> DocumentStore {
    DocumentStore::from_blocks(vec![
        Block::new("a", BlockType::Hero, "centered"),
        Block::new("b", BlockType::Footer, "columns"),
    ])
}

#[tokio::test(start_paused = true)]
async fn test_rapid_edits_produce_one_save() {
    let (saves, autosave) = coordinator();
    let mut store = store();
    DirtyWatcher::attach(&mut store, autosave.clone());

    for _ in 0..5 {
        store.toggle_block_visibility("a");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(autosave.status(), AutosaveStatus::Pending);

    tokio::time::sleep(Duration::from_millis(3_100)).await;
    assert_eq!(saves.load(Ordering::SeqCst), 1);
    assert_eq!(autosave.status(), AutosaveStatus::Saved);
}

#[tokio::test(start_paused = true)]
async fn test_selection_changes_do_not_schedule_saves() {
    let (saves, autosave) = coordinator();
    let mut store = store();
    DirtyWatcher::attach(&mut store, autosave.clone());

    store.select_block(Some("a"), SelectionMode::Replace);
    store.hover_block(Some("b"));
    assert_eq!(autosave.status(), AutosaveStatus::Idle);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(saves.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_detached_watcher_stops_scheduling() {
    let (saves, autosave) = coordinator();
    let mut store = store();
    let subscription = DirtyWatcher::attach(&mut store, autosave.clone());
    assert!(store.unsubscribe(subscription));

    store.move_block(0, 1);
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(saves.load(Ordering::SeqCst), 0);
}
