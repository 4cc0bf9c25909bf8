//! A cancellable, resettable delay in front of a background job.
//!
//! Scheduling while a job is still waiting replaces it and restarts the
//! timer. Once a job's delay has elapsed it runs to completion; neither
//! rescheduling nor cancelling interrupts a job that already started.

use crate::error::{Result, SyncError};
use std::future::Future;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::oneshot;

pub struct Debouncer {
    window: Duration,
    runtime: Handle,
    /// Dropping this sender cancels the waiting job
    pending: Option<oneshot::Sender<()>>,
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("window", &self.window)
            .field("pending", &self.is_pending())
            .finish()
    }
}

impl Debouncer {
    /// Create a debouncer on the current tokio runtime.
    pub fn new(window: Duration) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| SyncError::NoRuntime)?;
        Ok(Self::with_runtime(window, runtime))
    }

    pub fn with_runtime(window: Duration, runtime: Handle) -> Self {
        Self {
            window,
            runtime,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Run `job` after the window, replacing any job still waiting.
    pub fn schedule<F>(&mut self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        let window = self.window;
        self.runtime.spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(window) => job.await,
                _ = cancel_rx => tracing::trace!("Debounced job superseded"),
            }
        });
        self.pending = Some(cancel_tx);
    }

    /// Drop the waiting job, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether a job is waiting for its window to elapse.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|tx| !tx.is_closed())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_job(counter: &Arc<AtomicUsize>, value: usize) -> impl Future<Output = ()> {
        let counter = Arc::clone(counter);
        async move {
            counter.store(value, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn runs_after_window() {
        let ran = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(250)).unwrap();

        debouncer.schedule(counting_job(&ran, 1));
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(ran.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(ran.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn reschedule_resets_timer() {
        let value = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(250)).unwrap();

        debouncer.schedule(counting_job(&value, 1));
        tokio::time::sleep(Duration::from_millis(200)).await;
        debouncer.schedule(counting_job(&value, 2));
        tokio::time::sleep(Duration::from_millis(200)).await;

        // 400ms after the first schedule, but only 200ms after the second
        assert_eq!(value.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(value.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_run() {
        let ran = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(250)).unwrap();

        debouncer.schedule(counting_job(&ran, 1));
        debouncer.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels() {
        let ran = Arc::new(AtomicUsize::new(0));
        {
            let mut debouncer = Debouncer::new(Duration::from_millis(250)).unwrap();
            debouncer.schedule(counting_job(&ran, 1));
        }
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn requires_runtime() {
        assert!(matches!(
            Debouncer::new(Duration::from_millis(1)),
            Err(SyncError::NoRuntime)
        ));
    }
}
