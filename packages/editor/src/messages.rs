//! Cross-surface message protocol.
//!
//! The editor shell, the live preview and the layers panel run in separate
//! contexts and talk through these messages. Receivers must tolerate
//! reordering and stale references (a session already ended, a block
//! already gone).

use blockforge_common::{Block, BlockType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SurfaceMessage {
    /// Full block collection from the authoritative store
    #[serde(rename_all = "camelCase")]
    SyncBlocks { blocks: Vec<Block>, revision: u64 },

    #[serde(rename_all = "camelCase")]
    SyncSelection {
        selected_block_id: Option<String>,
        #[serde(default)]
        selected_block_ids: Vec<String>,
    },

    #[serde(rename_all = "camelCase")]
    Highlight { block_id: Option<String> },

    #[serde(rename_all = "camelCase")]
    InlineEditStart {
        block_id: String,
        field_path: String,
        #[serde(default)]
        original_value: Value,
    },

    #[serde(rename_all = "camelCase")]
    InlineEditChange {
        block_id: String,
        field_path: String,
        value: Value,
    },

    #[serde(rename_all = "camelCase")]
    InlineEditEnd { block_id: String, field_path: String },

    #[serde(rename_all = "camelCase")]
    InlineEditCancel { block_id: String, field_path: String },

    #[serde(rename_all = "camelCase")]
    BlockAction { block_id: String, action: BlockAction },
}

impl SurfaceMessage {
    pub fn name(&self) -> &'static str {
        match self {
            SurfaceMessage::SyncBlocks { .. } => "sync-blocks",
            SurfaceMessage::SyncSelection { .. } => "sync-selection",
            SurfaceMessage::Highlight { .. } => "highlight",
            SurfaceMessage::InlineEditStart { .. } => "inline-edit-start",
            SurfaceMessage::InlineEditChange { .. } => "inline-edit-change",
            SurfaceMessage::InlineEditEnd { .. } => "inline-edit-end",
            SurfaceMessage::InlineEditCancel { .. } => "inline-edit-cancel",
            SurfaceMessage::BlockAction { .. } => "block-action",
        }
    }

    /// Whether this message belongs to an inline-edit session
    pub fn is_inline_edit(&self) -> bool {
        matches!(
            self,
            SurfaceMessage::InlineEditStart { .. }
                | SurfaceMessage::InlineEditChange { .. }
                | SurfaceMessage::InlineEditEnd { .. }
                | SurfaceMessage::InlineEditCancel { .. }
        )
    }
}

/// Quick actions from the per-block toolbar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BlockAction {
    MoveUp,
    MoveDown,
    Duplicate,
    Delete,
    #[serde(rename_all = "camelCase")]
    AddBelow {
        block_type: BlockType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        variant: Option<String>,
    },
}
