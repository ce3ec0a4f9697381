use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Runs only the most recently scheduled task.
///
/// Scheduling cancels the previous task whether it is still waiting out its
/// delay or already running.
#[derive(Debug, Default)]
pub struct Debouncer {
    current: Mutex<Option<CancellationToken>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outside a Tokio runtime the task is dropped and nothing is scheduled.
    pub fn schedule<F>(&self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Ok(runtime) = Handle::try_current() else {
            debug!("no async runtime; debounced task skipped");
            return;
        };
        let token = CancellationToken::new();
        let previous = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(token.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }

        runtime.spawn(async move {
            tokio::select! {
                biased;
                () = token.cancelled() => {}
                () = async {
                    tokio::time::sleep(delay).await;
                    task.await;
                } => {}
            }
        });
    }

    pub fn cancel(&self) {
        let current = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(token) = current {
            token.cancel();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
