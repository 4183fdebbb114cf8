//! # Inline-Edit Sessions
//!
//! Click-to-type editing of a single settings field.
//!
//! ```text
//! start_edit ──► update_value* ──► end_edit(save)   → one history entry
//!                               └► end_edit(cancel) → original value, no history
//! ```
//!
//! Keystrokes write straight into the live block through
//! `update_value` without touching history; the whole session collapses
//! into a single undo step when it is saved.
//!
//! Callers end the session before running other mutations. If the store
//! changed underneath anyway, the session re-bases onto the current blocks:
//! keystrokes made before that change already sit inside its undo step.

use crate::document::DocumentStore;
use crate::errors::EditorError;
use blockforge_common::{Block, FieldPath};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct InlineEditSession {
    pub block_id: String,
    pub field_path: FieldPath,
    pub original_value: Value,

    /// Block collection before the first keystroke
    pre_snapshot: Vec<Block>,
    was_dirty: bool,

    /// At least one live write landed since `pre_snapshot`
    updated: bool,

    /// Store revision after this session's last write
    revision: u64,
}

impl InlineEditSession {
    fn rebase_if_moved(&mut self, store: &DocumentStore) {
        if store.revision() == self.revision {
            return;
        }
        tracing::debug!(block_id = %self.block_id, "document changed during inline edit");
        self.pre_snapshot = store.blocks().to_vec();
        self.was_dirty = store.is_dirty();
        self.updated = false;
        self.revision = store.revision();
    }
}

#[derive(Debug, Default)]
pub struct InlineEditor {
    session: Option<InlineEditSession>,
}

impl InlineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_session(&self) -> Option<&InlineEditSession> {
        self.session.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    /// Whether the active session targets exactly this field
    pub fn is_editing_field(&self, block_id: &str, field_path: &FieldPath) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.block_id == block_id && &s.field_path == field_path)
    }

    /// Begin editing `field_path` on `block_id`.
    ///
    /// A session on a different field is saved first. Returns `Ok(false)`
    /// when the block does not exist or the same field is already being
    /// edited; a malformed path is an error.
    pub fn start_edit(
        &mut self,
        store: &mut DocumentStore,
        block_id: &str,
        field_path: &str,
        original_value: Value,
    ) -> Result<bool, EditorError> {
        let field_path = FieldPath::parse(field_path)?;

        if !store.contains(block_id) {
            tracing::debug!(block_id = %block_id, "start_edit: unknown block");
            return Ok(false);
        }
        if self.is_editing_field(block_id, &field_path) {
            return Ok(false);
        }
        if self.is_editing() {
            self.end_edit(store, true);
        }

        store.select_only(block_id);
        tracing::debug!(block_id = %block_id, path = %field_path, "inline edit started");
        self.session = Some(InlineEditSession {
            block_id: block_id.to_string(),
            field_path,
            original_value,
            pre_snapshot: store.blocks().to_vec(),
            was_dirty: store.is_dirty(),
            updated: false,
            revision: store.revision(),
        });
        Ok(true)
    }

    /// Write the in-progress value into the live block, no history
    pub fn update_value(&mut self, store: &mut DocumentStore, value: Value) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session.rebase_if_moved(store);
        if !store.set_field_live(&session.block_id, &session.field_path, value) {
            return false;
        }
        session.updated = true;
        session.revision = store.revision();
        true
    }

    /// Finish the session: `save` records one undo step when any value was
    /// written, otherwise the original value is restored.
    pub fn end_edit(&mut self, store: &mut DocumentStore, save: bool) -> bool {
        let Some(mut session) = self.session.take() else {
            return false;
        };
        session.rebase_if_moved(store);

        if save {
            if session.updated {
                store.record_snapshot(session.pre_snapshot, "Edit text");
            } else {
                store.restore_dirty(session.was_dirty);
            }
            tracing::debug!(block_id = %session.block_id, "inline edit saved");
        } else {
            store.set_field_live(&session.block_id, &session.field_path, session.original_value);
            store.restore_dirty(session.was_dirty);
            tracing::debug!(block_id = %session.block_id, "inline edit cancelled");
        }
        true
    }
}
