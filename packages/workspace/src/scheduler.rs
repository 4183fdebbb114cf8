//! One-shot timers on the tokio runtime.
//!
//! A [`ScheduledTask`] owns at most one pending timer. Re-arming replaces
//! the previous timer, which is how debouncing is expressed everywhere in
//! this crate. Tests drive these timers with tokio's paused clock.

use crate::error::WorkspaceResult;
use std::future::Future;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct ScheduledTask {
    handle: Handle,
    task: Option<JoinHandle<()>>,
}

impl ScheduledTask {
    /// Bind to the runtime of the calling context
    pub fn new() -> WorkspaceResult<Self> {
        Ok(Self::with_handle(Handle::try_current()?))
    }

    pub fn with_handle(handle: Handle) -> Self {
        Self { handle, task: None }
    }

    /// Run `fire` after `delay`, replacing any pending timer
    pub fn arm<F>(&mut self, delay: Duration, fire: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.task = Some(self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            fire.await;
        }));
    }

    /// Drop the pending timer. Returns whether one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                let pending = !task.is_finished();
                task.abort();
                pending
            }
            None => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::{BoxFuture, FutureExt};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter() -> (Arc<AtomicUsize>, impl Fn() -> BoxFuture<'static, ()>) {
        let count = Arc::new(AtomicUsize::new(0));
        let handle = count.clone();
        let fire = move || {
            let handle = handle.clone();
            async move {
                handle.fetch_add(1, Ordering::SeqCst);
            }
            .boxed()
        };
        (count, fire)
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let (count, fire) = counter();
        let mut task = ScheduledTask::new().unwrap();
        task.arm(Duration::from_millis(100), fire());
        assert!(task.is_armed());

        tokio::time::sleep(Duration::from_millis(99)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!task.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_resets_timer() {
        let (count, fire) = counter();
        let mut task = ScheduledTask::new().unwrap();
        for _ in 0..5 {
            task.arm(Duration::from_millis(100), fire());
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_fire() {
        let (count, fire) = counter();
        let mut task = ScheduledTask::new().unwrap();
        task.arm(Duration::from_millis(100), fire());
        assert!(task.cancel());
        assert!(!task.cancel());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_requires_runtime() {
        assert!(ScheduledTask::new().is_err());
    }
}
