//! Single-slot block clipboard, mirrored to the host's system clipboard.

use crate::document::DocumentStore;
use crate::errors::EditorError;
use blockforge_common::{Block, BlockType, Settings};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClipboardError {
    #[error("System clipboard unavailable")]
    Unavailable,

    #[error("System clipboard access failed: {0}")]
    Access(String),
}

/// Host clipboard collaborator
pub trait SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
    fn read_text(&mut self) -> Result<Option<String>, ClipboardError>;
}

/// For hosts without a system clipboard; every call fails
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSystemClipboard;

impl SystemClipboard for NoSystemClipboard {
    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable)
    }

    fn read_text(&mut self) -> Result<Option<String>, ClipboardError> {
        Err(ClipboardError::Unavailable)
    }
}

/// In-process clipboard (tests, headless hosts)
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    pub text: Option<String>,
}

impl SystemClipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.text = Some(text.to_string());
        Ok(())
    }

    fn read_text(&mut self) -> Result<Option<String>, ClipboardError> {
        Ok(self.text.clone())
    }
}

/// Content of a copied block (identity and position are not copied)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardEntry {
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub variant: String,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default = "default_visible")]
    pub visible: bool,
    pub copied_at: DateTime<Utc>,
}

fn default_visible() -> bool {
    true
}

impl ClipboardEntry {
    pub fn from_block(block: &Block) -> Self {
        Self {
            block_type: block.block_type,
            variant: block.variant.clone(),
            settings: block.settings.clone(),
            visible: block.visible,
            copied_at: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(text)?)
    }

    /// New block (without an id yet) carrying this entry's content
    pub fn to_block(&self) -> Block {
        let mut block = Block::new(String::new(), self.block_type, self.variant.clone())
            .with_settings(self.settings.clone());
        block.visible = self.visible;
        block
    }
}

#[derive(Debug, Default)]
pub struct Clipboard {
    entry: Option<ClipboardEntry>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the selected block. Mirroring to `system` is best effort.
    pub fn copy(&mut self, store: &DocumentStore, system: &mut dyn SystemClipboard) -> bool {
        let Some(block) = store.selected_block() else {
            return false;
        };
        let entry = ClipboardEntry::from_block(block);

        match entry.to_json() {
            Ok(json) => {
                if let Err(err) = system.write_text(&json) {
                    tracing::warn!(error = %err, "failed to mirror block to system clipboard");
                }
            }
            Err(err) => tracing::warn!(error = %err, "failed to serialize clipboard entry"),
        }

        tracing::debug!(block_id = %block.id, "copied block");
        self.entry = Some(entry);
        true
    }

    /// Paste after the selected block (or at the end) and select the new
    /// block. A valid entry from `system` wins only when it is newer than
    /// the local slot.
    pub fn paste(&mut self, store: &mut DocumentStore, system: &mut dyn SystemClipboard) -> Option<String> {
        let system_entry = read_system_entry(system).filter(|entry| {
            self.entry
                .as_ref()
                .map_or(true, |local| entry.copied_at > local.copied_at)
        });
        if let Some(entry) = system_entry {
            self.entry = Some(entry);
        }
        let entry = self.entry.clone()?;

        let anchor = store.selected_block_id().map(str::to_string);
        let id = store.insert_block_after(anchor.as_deref(), entry.to_block(), "Paste block");
        tracing::debug!(block_id = %id, "pasted block");
        Some(id)
    }

    pub fn can_paste(&self) -> bool {
        self.entry.is_some()
    }

    pub fn entry(&self) -> Option<&ClipboardEntry> {
        self.entry.as_ref()
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}

fn read_system_entry(system: &mut dyn SystemClipboard) -> Option<ClipboardEntry> {
    match system.read_text() {
        Ok(Some(text)) => match ClipboardEntry::from_json(&text) {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::debug!(error = %err, "system clipboard holds no block");
                None
            }
        },
        Ok(None) => None,
        Err(err) => {
            tracing::warn!(error = %err, "failed to read system clipboard");
            None
        }
    }
}
