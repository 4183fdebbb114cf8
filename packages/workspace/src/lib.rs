//! # Blockforge Workspace
//!
//! Async coordination around the synchronous editor core: debounced
//! timers, autosave, inline-edit relaying and the message bridge between
//! editor surfaces. Everything here runs on tokio; the store itself stays
//! single-threaded and is only touched from the task that owns it.

pub mod autosave;
pub mod bridge;
pub mod error;
pub mod relay;
pub mod scheduler;

pub use autosave::{
    save_callback, AutosaveCoordinator, AutosaveState, AutosaveStatus, SaveCallback,
};
pub use bridge::{DirtyWatcher, SurfaceBridge};
pub use error::{WorkspaceError, WorkspaceResult};
pub use relay::EditRelay;
pub use scheduler::ScheduledTask;
