//! # Document Store
//!
//! The authoritative block collection plus selection, hover, history and
//! the dirty flag. Every other component reads blocks through this store
//! and mutates them only by calling its operations.
//!
//! ## Transactions
//!
//! ```text
//! validate → snapshot-for-undo → apply → normalize → record → notify
//! ```
//!
//! Each public operation either applies fully or is a no-op. Expected
//! conditions (unknown ids, out-of-range indices, locked blocks) never
//! produce errors; mutating operations report whether they applied.
//!
//! After every operation that changed observable state, subscribers are
//! called synchronously with the same [`EditorSnapshot`].

use crate::history::History;
use crate::selection::{Selection, SelectionMode};
use crate::styles::CopiedStyles;
use crate::tree;
use blockforge_common::{
    collect_ids, Block, EditorConfig, FieldPath, IdGenerator,
};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

/// Read-only view handed to subscribers after each change
#[derive(Debug, Clone, Copy)]
pub struct EditorSnapshot<'a> {
    pub blocks: &'a [Block],
    pub selected_block_id: Option<&'a str>,
    pub selected_block_ids: &'a [String],
    pub hovered_block_id: Option<&'a str>,
    pub is_dirty: bool,
    pub can_undo: bool,
    pub can_redo: bool,

    /// Increments on every change to the block collection
    pub revision: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&EditorSnapshot<'_>) + Send>;

pub struct DocumentStore {
    blocks: Vec<Block>,
    pub(crate) selection: Selection,
    hovered_block_id: Option<String>,
    history: History,
    dirty: bool,
    revision: u64,
    pub(crate) copied_styles: Option<CopiedStyles>,
    ids: IdGenerator,
    config: EditorConfig,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            blocks: Vec::new(),
            selection: Selection::default(),
            hovered_block_id: None,
            history: History::with_max_levels(config.history_limit),
            dirty: false,
            revision: 0,
            copied_styles: None,
            ids: IdGenerator::new("blockforge-document"),
            config,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Use a caller-provided id generator (deterministic ids in tests)
    pub fn with_id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    /// Store preloaded with `blocks`, no history
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        let mut store = Self::new();
        store.set_blocks(blocks);
        store
    }

    /// Return to the initial empty state; subscribers stay registered
    pub fn reset(&mut self) {
        self.blocks.clear();
        self.selection.clear();
        self.hovered_block_id = None;
        self.history.clear();
        self.dirty = false;
        self.revision += 1;
        self.copied_styles = None;
        self.notify();
    }

    /// Replace the whole collection without recording history
    pub fn set_blocks(&mut self, blocks: Vec<Block>) {
        self.blocks = blocks;
        self.dedupe_ids();
        tree::normalize(&mut self.blocks);
        self.prune_stale_references();
        self.revision += 1;
        self.notify();
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Find a block at any depth
    pub fn block(&self, id: &str) -> Option<&Block> {
        tree::find(&self.blocks, id)
    }

    pub fn contains(&self, id: &str) -> bool {
        tree::contains(&self.blocks, id)
    }

    /// Index among top-level blocks
    pub fn block_index(&self, id: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_block_id(&self) -> Option<&str> {
        self.selection.primary()
    }

    pub fn selected_block_ids(&self) -> &[String] {
        self.selection.ids()
    }

    pub fn selected_block(&self) -> Option<&Block> {
        self.selection.primary().and_then(|id| self.block(id))
    }

    pub fn hovered_block_id(&self) -> Option<&str> {
        self.hovered_block_id.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_len(&self) -> usize {
        self.history.undo_levels()
    }

    pub fn future_len(&self) -> usize {
        self.history.redo_levels()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn snapshot(&self) -> EditorSnapshot<'_> {
        EditorSnapshot {
            blocks: &self.blocks,
            selected_block_id: self.selection.primary(),
            selected_block_ids: self.selection.ids(),
            hovered_block_id: self.hovered_block_id.as_deref(),
            is_dirty: self.dirty,
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
            revision: self.revision,
        }
    }

    /// Clear the dirty flag once the host has persisted the document
    pub fn mark_saved(&mut self) {
        if self.dirty {
            self.dirty = false;
            self.notify();
        }
    }

    // ---------------------------------------------------------------------
    // Subscriptions
    // ---------------------------------------------------------------------

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&EditorSnapshot<'_>) + Send + 'static,
    {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub(crate) fn notify(&mut self) {
        let mut listeners = std::mem::take(&mut self.listeners);
        let snapshot = self.snapshot();
        for (_, listener) in listeners.iter_mut() {
            listener(&snapshot);
        }
        self.listeners = listeners;
    }

    // ---------------------------------------------------------------------
    // Selection & hover (never touch history or the dirty flag)
    // ---------------------------------------------------------------------

    pub fn select_block(&mut self, id: Option<&str>, mode: SelectionMode) -> bool {
        if let Some(id) = id {
            if !self.contains(id) {
                tracing::debug!(block_id = %id, "select_block: unknown block");
                return false;
            }
        }
        self.update_selection(|selection| selection.select(id, mode))
    }

    pub fn select_blocks(&mut self, ids: &[String]) -> bool {
        let existing: Vec<String> = ids.iter().filter(|id| self.contains(id)).cloned().collect();
        self.update_selection(|selection| selection.set_many(&existing))
    }

    pub fn add_to_selection(&mut self, id: &str) -> bool {
        self.select_block(Some(id), SelectionMode::Add)
    }

    pub fn remove_from_selection(&mut self, id: &str) -> bool {
        self.update_selection(|selection| selection.remove(id))
    }

    pub fn toggle_selection(&mut self, id: &str) -> bool {
        self.select_block(Some(id), SelectionMode::Toggle)
    }

    pub fn clear_selection(&mut self) -> bool {
        self.update_selection(Selection::clear)
    }

    /// Select every top-level block in document order
    pub fn select_all(&mut self) -> bool {
        let ids: Vec<String> = self.blocks.iter().map(|b| b.id.clone()).collect();
        self.update_selection(|selection| selection.set_many(&ids))
    }

    /// Select every member of a group
    pub fn select_group(&mut self, group_id: &str) -> bool {
        let members: Vec<String> = collect_ids(&self.blocks)
            .into_iter()
            .filter(|id| {
                self.block(id)
                    .is_some_and(|b| b.group_id.as_deref() == Some(group_id))
            })
            .collect();
        if members.is_empty() {
            return false;
        }
        self.update_selection(|selection| selection.set_many(&members))
    }

    fn update_selection(&mut self, change: impl FnOnce(&mut Selection)) -> bool {
        let before = self.selection.clone();
        change(&mut self.selection);
        if self.selection == before {
            return false;
        }
        self.notify();
        true
    }

    pub fn hover_block(&mut self, id: Option<&str>) -> bool {
        if let Some(id) = id {
            if !self.contains(id) {
                return false;
            }
        }
        if self.hovered_block_id.as_deref() == id {
            return false;
        }
        self.hovered_block_id = id.map(str::to_string);
        self.notify();
        true
    }

    // ---------------------------------------------------------------------
    // History
    // ---------------------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.undo(self.blocks.clone()) else {
            return false;
        };
        tracing::debug!(remaining = self.history.undo_levels(), "undo");
        self.restore(previous);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.redo(self.blocks.clone()) else {
            return false;
        };
        tracing::debug!(remaining = self.history.redo_levels(), "redo");
        self.restore(next);
        true
    }

    fn restore(&mut self, blocks: Vec<Block>) {
        self.blocks = blocks;
        self.prune_stale_references();
        self.dirty = true;
        self.revision += 1;
        self.notify();
    }

    // ---------------------------------------------------------------------
    // Transaction plumbing
    // ---------------------------------------------------------------------

    /// Run `apply` as one undoable transaction.
    ///
    /// When `apply` returns false every change it made is rolled back and
    /// nothing is recorded.
    pub(crate) fn commit(&mut self, label: &str, apply: impl FnOnce(&mut Self) -> bool) -> bool {
        let before_blocks = self.blocks.clone();
        let before_selection = self.selection.clone();

        if !apply(self) {
            self.blocks = before_blocks;
            self.selection = before_selection;
            tracing::debug!(operation = label, "no-op");
            return false;
        }

        tree::normalize(&mut self.blocks);
        self.prune_stale_references();
        self.history.push(before_blocks, label);
        self.dirty = true;
        self.revision += 1;
        tracing::debug!(operation = label, blocks = self.blocks.len(), "applied");
        self.notify();
        true
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }

    /// Mint an id that is not present anywhere in the tree
    pub(crate) fn fresh_id(&mut self, prefix: &str) -> String {
        loop {
            let id = self.ids.new_id(prefix);
            if !self.contains(&id) {
                return id;
            }
        }
    }

    /// Give `block` and its whole subtree new ids
    pub(crate) fn reidentify(&mut self, block: &mut Block) {
        block.id = self.fresh_id(block.block_type.as_str());
        if let Some(children) = block.children.as_mut() {
            for child in children.iter_mut() {
                self.reidentify(child);
            }
        }
    }

    /// Replace empty or colliding ids so every id is unique
    fn dedupe_ids(&mut self) {
        let mut seen = HashSet::new();
        let mut blocks = std::mem::take(&mut self.blocks);
        tree::for_each_mut(&mut blocks, &mut |block: &mut Block| {
            if block.id.is_empty() || !seen.insert(block.id.clone()) {
                let replacement = self.ids.new_id(block.block_type.as_str());
                tracing::warn!(
                    old_id = %block.id,
                    new_id = %replacement,
                    "replacing duplicate block id"
                );
                block.id = replacement.clone();
                seen.insert(replacement);
            }
        });
        self.blocks = blocks;
    }

    fn prune_stale_references(&mut self) {
        let blocks = &self.blocks;
        self.selection.retain(|id| tree::contains(blocks, id));
        if let Some(hovered) = &self.hovered_block_id {
            if !tree::contains(blocks, hovered) {
                self.hovered_block_id = None;
            }
        }
    }

    // ---------------------------------------------------------------------
    // Live field writes (inline editing)
    // ---------------------------------------------------------------------

    /// Write a settings field without recording history
    pub(crate) fn set_field_live(&mut self, block_id: &str, path: &FieldPath, value: Value) -> bool {
        let Some(block) = tree::find_mut(&mut self.blocks, block_id) else {
            return false;
        };
        if let Err(err) = path.set(&mut block.settings, value) {
            tracing::warn!(block_id = %block_id, path = %path, error = %err, "live field write failed");
            return false;
        }
        self.dirty = true;
        self.revision += 1;
        self.notify();
        true
    }

    /// Record a snapshot captured outside a `commit` (e.g. an edit session)
    pub(crate) fn record_snapshot(&mut self, snapshot: Vec<Block>, label: &str) {
        self.history.push(snapshot, label);
        self.dirty = true;
        self.notify();
    }

    pub(crate) fn restore_dirty(&mut self, dirty: bool) {
        if self.dirty != dirty {
            self.dirty = dirty;
            self.notify();
        }
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentStore")
            .field("blocks", &self.blocks)
            .field("selection", &self.selection)
            .field("hovered_block_id", &self.hovered_block_id)
            .field("history", &self.history.undo_levels())
            .field("future", &self.history.redo_levels())
            .field("dirty", &self.dirty)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
