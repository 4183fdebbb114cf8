//! # Blockforge Editor
//!
//! In-memory, undoable, observable state engine for the block editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ surfaces: layers panel, preview, overlay    │
//! └─────────────────────────────────────────────┘
//!              ↓ operations        ↑ snapshots
//! ┌─────────────────────────────────────────────┐
//! │ DocumentStore: single source of truth       │
//! │  - Block tree, selection, hover             │
//! │  - Snapshot history (undo/redo)             │
//! │  - Dirty flag + subscribers                 │
//! └─────────────────────────────────────────────┘
//!              ↑ façades
//! ┌─────────────────────────────────────────────┐
//! │ InlineEditor · Clipboard · DragSession      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **One store**: every other component mutates blocks through it
//! 2. **Transactional**: an operation fully applies or is a no-op
//! 3. **No errors for expected conditions**: unknown ids and
//!    out-of-range indices return `false`
//! 4. **Synchronous notification**: subscribers see the new snapshot
//!    before the operation returns
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blockforge_editor::{DocumentStore, SelectionMode};
//! use blockforge_common::BlockType;
//!
//! let mut store = DocumentStore::new();
//! let hero = store.add_block_by_type(BlockType::Hero, None);
//! store.add_block_by_type(BlockType::Footer, None);
//!
//! store.move_block(0, 1);
//! store.undo();
//!
//! store.select_block(Some(&hero), SelectionMode::Replace);
//! let id = store.duplicate_block(&hero);
//! ```

mod clipboard;
mod container;
mod document;
mod drag;
mod errors;
mod geometry;
mod guides;
mod history;
mod inline_edit;
mod messages;
mod navigation;
mod operations;
mod selection;
mod styles;
mod tree;

pub use clipboard::{
    Clipboard, ClipboardEntry, ClipboardError, MemoryClipboard, NoSystemClipboard, SystemClipboard,
};
pub use document::{DocumentStore, EditorSnapshot, SubscriptionId};
pub use drag::DragSession;
pub use errors::EditorError;
pub use geometry::Rect;
pub use guides::{
    compute_guides, Guide, GuideAxis, GuideKind, GuideOptions, GuideResult, DEFAULT_SNAP_THRESHOLD,
};
pub use history::{History, HistoryEntry, DEFAULT_HISTORY_LIMIT};
pub use inline_edit::{InlineEditSession, InlineEditor};
pub use messages::{BlockAction, SurfaceMessage};
pub use navigation::{next_field, previous_field, reading_order, EditableField, DEFAULT_ROW_TOLERANCE};
pub use operations::MoveDirection;
pub use selection::{Selection, SelectionMode};
pub use styles::{CopiedStyles, STYLE_KEYS};
