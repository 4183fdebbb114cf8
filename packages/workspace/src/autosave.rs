//! # Autosave Coordinator
//!
//! Debounced persistence with exponential-backoff retries.
//!
//! ```text
//!            start()                 timer expires
//!   Idle ───────────► Pending ───────────────────► Saving
//!    ▲                  │ cancel()                 │  │
//!    └──────────────────┘                  success │  │ retries exhausted
//!                                                  ▼  ▼
//!                                              Saved  Error ── retry() ──► Saving
//! ```
//!
//! A failed save is retried after `retry_delay * 2^(attempt-1)` up to
//! `max_retries` times. `cancel()` only drops a pending timer; a save that
//! is already running always completes. `stop()` disables the coordinator
//! for good.

use crate::error::WorkspaceResult;
use crate::scheduler::ScheduledTask;
use blockforge_common::AutosaveConfig;
use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// Persistence collaborator, invoked once per save attempt
pub type SaveCallback = Arc<dyn Fn() -> BoxFuture<'static, Result<(), String>> + Send + Sync>;

/// Wrap an async closure as a [`SaveCallback`]
pub fn save_callback<F, Fut>(save: F) -> SaveCallback
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), String>> + Send + 'static,
{
    Arc::new(move || save().boxed())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AutosaveStatus {
    Idle,
    Pending,
    Saving,
    Saved,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutosaveState {
    pub status: AutosaveStatus,
    pub last_saved_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl Default for AutosaveState {
    fn default() -> Self {
        Self {
            status: AutosaveStatus::Idle,
            last_saved_at: None,
            error: None,
        }
    }
}

#[derive(Debug, Default)]
struct Flags {
    stopped: bool,
    /// The debounce timer is armed
    scheduled: bool,
    in_flight: bool,
    /// A save was requested while another one was running
    rerun: bool,
}

struct Inner {
    config: AutosaveConfig,
    save: SaveCallback,
    timer: Mutex<ScheduledTask>,
    flags: Mutex<Flags>,
    state: watch::Sender<AutosaveState>,
}

#[derive(Clone)]
pub struct AutosaveCoordinator {
    inner: Arc<Inner>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl AutosaveCoordinator {
    /// Must be called from within a tokio runtime
    pub fn new(config: AutosaveConfig, save: SaveCallback) -> WorkspaceResult<Self> {
        let (state, _) = watch::channel(AutosaveState::default());
        Ok(Self {
            inner: Arc::new(Inner {
                config,
                save,
                timer: Mutex::new(ScheduledTask::new()?),
                flags: Mutex::new(Flags::default()),
                state,
            }),
        })
    }

    /// Arm (or re-arm) the debounce timer
    pub fn start(&self) {
        {
            let mut flags = lock(&self.inner.flags);
            if flags.stopped {
                return;
            }
            flags.scheduled = true;
        }

        let inner = self.inner.clone();
        lock(&self.inner.timer).arm(self.inner.config.debounce(), async move {
            lock(&inner.flags).scheduled = false;
            // Detach so cancelling the timer never aborts a running save
            tokio::spawn(Inner::run(inner));
        });

        self.inner.state.send_modify(|state| {
            if state.status != AutosaveStatus::Saving {
                state.status = AutosaveStatus::Pending;
            }
        });
        tracing::debug!(debounce_ms = self.inner.config.debounce_ms, "autosave scheduled");
    }

    /// Drop a pending save; an in-flight save is left alone
    pub fn cancel(&self) -> bool {
        let cancelled = lock(&self.inner.timer).cancel();
        let rerun = {
            let mut flags = lock(&self.inner.flags);
            flags.scheduled = false;
            std::mem::take(&mut flags.rerun)
        };
        self.inner.reset_pending();
        cancelled || rerun
    }

    /// Re-attempt immediately after retries were exhausted
    pub fn retry(&self) -> bool {
        {
            let mut flags = lock(&self.inner.flags);
            if flags.stopped || flags.in_flight || self.status() != AutosaveStatus::Error {
                return false;
            }
            flags.in_flight = true;
            self.inner
                .state
                .send_modify(|state| state.status = AutosaveStatus::Saving);
        }
        tracing::info!("autosave retry requested");
        tokio::spawn(Inner::drive(self.inner.clone()));
        true
    }

    /// Permanently disable; a running save still completes
    pub fn stop(&self) {
        {
            let mut flags = lock(&self.inner.flags);
            flags.stopped = true;
            flags.scheduled = false;
        }
        lock(&self.inner.timer).cancel();
        self.inner.reset_pending();
        tracing::info!("autosave stopped");
    }

    pub fn is_stopped(&self) -> bool {
        lock(&self.inner.flags).stopped
    }

    pub fn is_pending(&self) -> bool {
        self.status() == AutosaveStatus::Pending
    }

    pub fn is_saving(&self) -> bool {
        self.status() == AutosaveStatus::Saving
    }

    pub fn status(&self) -> AutosaveStatus {
        self.inner.state.borrow().status
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.inner.state.borrow().last_saved_at
    }

    pub fn error(&self) -> Option<String> {
        self.inner.state.borrow().error.clone()
    }

    pub fn state(&self) -> AutosaveState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AutosaveState> {
        self.inner.state.subscribe()
    }
}

impl std::fmt::Debug for AutosaveCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutosaveCoordinator")
            .field("config", &self.inner.config)
            .field("state", &*self.inner.state.borrow())
            .finish()
    }
}

impl Inner {
    fn reset_pending(&self) {
        self.state.send_modify(|state| {
            if state.status == AutosaveStatus::Pending {
                state.status = AutosaveStatus::Idle;
            }
        });
    }

    async fn run(inner: Arc<Inner>) {
        {
            let mut flags = lock(&inner.flags);
            if flags.stopped {
                return;
            }
            if flags.in_flight {
                flags.rerun = true;
                return;
            }
            flags.in_flight = true;
        }
        Inner::drive(inner).await;
    }

    /// Save until no rerun is requested; the caller holds `in_flight`
    async fn drive(inner: Arc<Inner>) {
        loop {
            inner.save_with_retries().await;

            let mut flags = lock(&inner.flags);
            if flags.rerun && !flags.stopped {
                flags.rerun = false;
                continue;
            }
            flags.in_flight = false;
            flags.rerun = false;
            break;
        }
    }

    /// Another save is already scheduled behind the one that just finished
    fn save_queued(&self) -> bool {
        let flags = lock(&self.flags);
        flags.scheduled || flags.rerun
    }

    async fn save_with_retries(&self) {
        self.state.send_modify(|state| {
            state.status = AutosaveStatus::Saving;
            state.error = None;
        });

        let mut attempt: u32 = 0;
        loop {
            match (self.save)().await {
                Ok(()) => {
                    let now = Utc::now();
                    let status = if self.save_queued() {
                        AutosaveStatus::Pending
                    } else {
                        AutosaveStatus::Saved
                    };
                    self.state.send_modify(|state| {
                        state.status = status;
                        state.last_saved_at = Some(now);
                        state.error = None;
                    });
                    tracing::info!(retries = attempt, "autosave complete");
                    return;
                }
                Err(err) if attempt >= self.config.max_retries => {
                    tracing::error!(error = %err, attempts = attempt + 1, "autosave failed");
                    let status = if self.save_queued() {
                        AutosaveStatus::Pending
                    } else {
                        AutosaveStatus::Error
                    };
                    self.state.send_modify(|state| {
                        state.status = status;
                        state.error = Some(err);
                    });
                    return;
                }
                Err(err) => {
                    attempt += 1;
                    let delay = self.config.retry_delay(attempt);
                    tracing::warn!(
                        error = %err,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "autosave attempt failed, retrying",
                    );
                    tokio::time::sleep(delay).await;

                    if lock(&self.flags).stopped {
                        self.state.send_modify(|state| state.status = AutosaveStatus::Idle);
                        return;
                    }
                }
            }
        }
    }
}
