//! Debounced forwarding of inline-edit messages between surfaces.
//!
//! Keystrokes arrive as a stream of `InlineEditChange` messages; only the
//! last value inside the quiet window is forwarded. Session boundaries
//! (start, end, cancel) drop whatever change is still waiting and are
//! forwarded immediately. Every other message passes straight through.

use crate::error::{WorkspaceError, WorkspaceResult};
use crate::scheduler::ScheduledTask;
use blockforge_common::EditorConfig;
use blockforge_editor::SurfaceMessage;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

type PendingSlot = Arc<Mutex<Option<SurfaceMessage>>>;

#[derive(Debug)]
pub struct EditRelay {
    debounce: Duration,
    outbound: UnboundedSender<SurfaceMessage>,
    pending: PendingSlot,
    timer: ScheduledTask,
}

impl EditRelay {
    pub fn new(debounce: Duration, outbound: UnboundedSender<SurfaceMessage>) -> WorkspaceResult<Self> {
        Ok(Self {
            debounce,
            outbound,
            pending: Arc::new(Mutex::new(None)),
            timer: ScheduledTask::new()?,
        })
    }

    /// Relay on the editing surface (keystroke side)
    pub fn origin(config: &EditorConfig, outbound: UnboundedSender<SurfaceMessage>) -> WorkspaceResult<Self> {
        Self::new(config.inline_edit_debounce(), outbound)
    }

    /// Relay on the receiving side, in front of the store
    pub fn receiver(config: &EditorConfig, outbound: UnboundedSender<SurfaceMessage>) -> WorkspaceResult<Self> {
        Self::new(config.relay_debounce(), outbound)
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn has_pending(&self) -> bool {
        lock(&self.pending).is_some()
    }

    pub fn push(&mut self, message: SurfaceMessage) -> WorkspaceResult<()> {
        match message {
            SurfaceMessage::InlineEditChange { .. } => {
                *lock(&self.pending) = Some(message);
                let pending = self.pending.clone();
                let outbound = self.outbound.clone();
                self.timer.arm(self.debounce, async move {
                    let message = lock(&pending).take();
                    if let Some(message) = message {
                        if outbound.send(message).is_err() {
                            tracing::debug!("relay receiver dropped");
                        }
                    }
                });
                Ok(())
            }
            SurfaceMessage::InlineEditStart { .. }
            | SurfaceMessage::InlineEditEnd { .. }
            | SurfaceMessage::InlineEditCancel { .. } => {
                self.discard();
                self.forward(message)
            }
            other => self.forward(other),
        }
    }

    /// Drop any change still waiting for the quiet window
    pub fn discard(&mut self) -> bool {
        self.timer.cancel();
        let dropped = lock(&self.pending).take();
        if dropped.is_some() {
            tracing::debug!("discarded pending inline edit change");
        }
        dropped.is_some()
    }

    fn forward(&self, message: SurfaceMessage) -> WorkspaceResult<()> {
        self.outbound
            .send(message)
            .map_err(|_| WorkspaceError::ChannelClosed)
    }
}

fn lock<T>(slot: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::mpsc;

    fn change(value: &str) -> SurfaceMessage {
        SurfaceMessage::InlineEditChange {
            block_id: "hero".into(),
            field_path: "settings.title".into(),
            value: json!(value),
        }
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_final_value_forwarded() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut relay = EditRelay::origin(&EditorConfig::default(), tx).unwrap();

        for value in ["H", "He", "Hel", "Hello"] {
            relay.push(change(value)).unwrap();
            advance(100).await;
        }
        assert!(rx.try_recv().is_err());

        advance(250).await;
        assert_eq!(rx.try_recv().unwrap(), change("Hello"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_end_discards_pending() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut relay = EditRelay::receiver(&EditorConfig::default(), tx).unwrap();

        relay.push(change("draft")).unwrap();
        assert!(relay.has_pending());
        let end = SurfaceMessage::InlineEditCancel {
            block_id: "hero".into(),
            field_path: "settings.title".into(),
        };
        relay.push(end.clone()).unwrap();

        advance(1_000).await;
        assert_eq!(rx.try_recv().unwrap(), end);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_messages_pass_through() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut relay = EditRelay::receiver(&EditorConfig::default(), tx).unwrap();

        let highlight = SurfaceMessage::Highlight {
            block_id: Some("hero".into()),
        };
        relay.push(change("x")).unwrap();
        relay.push(highlight.clone()).unwrap();
        assert_eq!(rx.try_recv().unwrap(), highlight);

        advance(60).await;
        assert_eq!(rx.try_recv().unwrap(), change("x"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_channel_reports_error() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut relay = EditRelay::receiver(&EditorConfig::default(), tx).unwrap();
        drop(rx);
        let result = relay.push(SurfaceMessage::Highlight { block_id: None });
        assert!(matches!(result, Err(WorkspaceError::ChannelClosed)));
    }
}
