//! # Surface Bridge
//!
//! Applies inbound [`SurfaceMessage`]s to the authoritative store and
//! answers with the sync messages the other surfaces need.
//!
//! ```text
//! preview / layers ──SurfaceMessage──► SurfaceBridge ──► DocumentStore
//!        ▲                                   │
//!        └────── SyncBlocks / SyncSelection ─┘
//! ```
//!
//! Messages are handled in arrival order but never assumed to be fresh:
//! an inline-edit message for a session that is no longer active, or an
//! action on a block that is gone, is dropped.
//!
//! Structural messages arriving mid-edit checkpoint the inline session:
//! the typing so far becomes its own undo step and a fresh session on the
//! same field picks up the keystrokes that follow.

use crate::autosave::AutosaveCoordinator;
use blockforge_common::FieldPath;
use blockforge_editor::{
    BlockAction, DocumentStore, InlineEditor, Selection, SubscriptionId, SurfaceMessage,
};
use serde_json::Value;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

#[derive(Debug, Default)]
pub struct SurfaceBridge {
    store: DocumentStore,
    editor: InlineEditor,
}

impl SurfaceBridge {
    pub fn new(store: DocumentStore) -> Self {
        Self {
            store,
            editor: InlineEditor::new(),
        }
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut DocumentStore {
        &mut self.store
    }

    pub fn editor(&self) -> &InlineEditor {
        &self.editor
    }

    pub fn into_store(self) -> DocumentStore {
        self.store
    }

    /// Apply one message; returns the sync messages to broadcast
    pub fn handle(&mut self, message: SurfaceMessage) -> Vec<SurfaceMessage> {
        let revision = self.store.revision();
        let selection = self.store.selection().clone();
        let name = message.name();

        let applied = self.apply(message);
        tracing::debug!(message = name, applied, "surface message");

        let mut outbound = Vec::new();
        if self.store.revision() != revision {
            outbound.push(SurfaceMessage::SyncBlocks {
                blocks: self.store.blocks().to_vec(),
                revision: self.store.revision(),
            });
        }
        if *self.store.selection() != selection {
            outbound.push(sync_selection(self.store.selection()));
        }
        outbound
    }

    fn apply(&mut self, message: SurfaceMessage) -> bool {
        match message {
            SurfaceMessage::SyncBlocks { blocks, .. } => {
                self.checkpoint_session();
                self.store.set_blocks(blocks);
                true
            }
            SurfaceMessage::SyncSelection {
                selected_block_id,
                selected_block_ids,
            } => {
                if selected_block_ids.is_empty() {
                    return self
                        .store
                        .select_block(selected_block_id.as_deref(), Default::default());
                }
                let mut changed = self.store.select_blocks(&selected_block_ids);
                if let Some(primary) = selected_block_id {
                    if self.store.selected_block_id() != Some(primary.as_str()) {
                        changed |= self.store.add_to_selection(&primary);
                    }
                }
                changed
            }
            SurfaceMessage::Highlight { block_id } => self.store.hover_block(block_id.as_deref()),
            SurfaceMessage::InlineEditStart {
                block_id,
                field_path,
                original_value,
            } => match self
                .editor
                .start_edit(&mut self.store, &block_id, &field_path, original_value)
            {
                Ok(started) => started,
                Err(err) => {
                    tracing::warn!(block_id = %block_id, error = %err, "rejected inline edit start");
                    false
                }
            },
            SurfaceMessage::InlineEditChange {
                block_id,
                field_path,
                value,
            } => {
                if !self.is_active(&block_id, &field_path) {
                    tracing::debug!(block_id = %block_id, "stale inline edit change");
                    return false;
                }
                self.editor.update_value(&mut self.store, value)
            }
            SurfaceMessage::InlineEditEnd {
                block_id,
                field_path,
            } => self.is_active(&block_id, &field_path) && self.editor.end_edit(&mut self.store, true),
            SurfaceMessage::InlineEditCancel {
                block_id,
                field_path,
            } => self.is_active(&block_id, &field_path) && self.editor.end_edit(&mut self.store, false),
            SurfaceMessage::BlockAction { block_id, action } => {
                self.checkpoint_session();
                self.apply_action(&block_id, action)
            }
        }
    }

    /// Save the active inline session and reopen it on the same field
    fn checkpoint_session(&mut self) {
        let Some(session) = self.editor.active_session() else {
            return;
        };
        let block_id = session.block_id.clone();
        let field_path = session.field_path.clone();
        let current = self
            .store
            .block(&block_id)
            .and_then(|block| field_path.get(&block.settings))
            .cloned()
            .unwrap_or(Value::Null);

        self.editor.end_edit(&mut self.store, true);
        if let Err(err) =
            self.editor
                .start_edit(&mut self.store, &block_id, &field_path.to_string(), current)
        {
            tracing::warn!(block_id = %block_id, error = %err, "could not reopen inline edit");
        }
        tracing::debug!(block_id = %block_id, "inline edit checkpointed");
    }

    fn is_active(&self, block_id: &str, field_path: &str) -> bool {
        FieldPath::parse(field_path)
            .map(|path| self.editor.is_editing_field(block_id, &path))
            .unwrap_or(false)
    }

    fn apply_action(&mut self, block_id: &str, action: BlockAction) -> bool {
        match action {
            BlockAction::MoveUp => self.store.move_block_up(block_id),
            BlockAction::MoveDown => self.store.move_block_down(block_id),
            BlockAction::Duplicate => self.store.duplicate_block(block_id).is_some(),
            BlockAction::Delete => self.store.remove_block(block_id),
            BlockAction::AddBelow {
                block_type,
                variant,
            } => self
                .store
                .add_block_below(block_id, block_type, variant.as_deref())
                .is_some(),
        }
    }

    /// Process messages until the inbound channel closes or nobody is
    /// listening any more. Returns the bridge for inspection.
    pub async fn run(
        mut self,
        mut inbound: UnboundedReceiver<SurfaceMessage>,
        outbound: UnboundedSender<SurfaceMessage>,
    ) -> Self {
        while let Some(message) = inbound.recv().await {
            for reply in self.handle(message) {
                if outbound.send(reply).is_err() {
                    tracing::info!("surface bridge outbound closed");
                    return self;
                }
            }
        }
        self
    }
}

fn sync_selection(selection: &Selection) -> SurfaceMessage {
    SurfaceMessage::SyncSelection {
        selected_block_id: selection.primary().map(str::to_string),
        selected_block_ids: selection.ids().to_vec(),
    }
}

/// Store subscriber that schedules an autosave whenever the document
/// changes while dirty
pub struct DirtyWatcher;

impl DirtyWatcher {
    pub fn attach(store: &mut DocumentStore, autosave: AutosaveCoordinator) -> SubscriptionId {
        let mut last_revision = store.revision();
        store.subscribe(move |snapshot| {
            if snapshot.revision == last_revision {
                return;
            }
            last_revision = snapshot.revision;
            if snapshot.is_dirty {
                autosave.start();
            }
        })
    }
}
