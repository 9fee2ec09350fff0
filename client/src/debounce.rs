//! Trailing-edge debouncer
//!
//! Values pushed in quick succession collapse into the last one, which is
//! handed to the handler once no new value arrived for the quiet period.

use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Default quiet period for search input
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawn a debouncer calling `handler` with each settled value
    pub fn spawn<F, Fut>(delay: Duration, handler: F) -> Self
    where
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (input, rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();
        let task = tokio::spawn(run(delay, rx, token.clone(), handler));
        Self { input, token, task }
    }

    /// Offer a new value, restarting the quiet period
    pub fn push(&self, value: T) {
        if self.input.send(value).is_err() {
            tracing::debug!("Debouncer is closed");
        }
    }

    /// Drop any pending value and stop
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.task.is_finished()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn run<T, F, Fut>(
    delay: Duration,
    mut rx: mpsc::UnboundedReceiver<T>,
    token: CancellationToken,
    mut handler: F,
) where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = ()>,
{
    loop {
        let mut pending = tokio::select! {
            _ = token.cancelled() => return,
            value = rx.recv() => match value {
                Some(value) => value,
                None => return,
            },
        };

        // Wait out the quiet period, keeping only the newest value
        loop {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(delay) => break,
                value = rx.recv() => match value {
                    Some(value) => pending = value,
                    None => break,
                },
            }
        }

        handler(pending).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn recording() -> (Arc<Mutex<Vec<String>>>, impl FnMut(String) -> std::future::Ready<()>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let handler = move |value: String| {
            sink.lock().push(value);
            std::future::ready(())
        };
        (seen, handler)
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_input_collapses_to_last_value() {
        let (seen, handler) = recording();
        let debouncer = Debouncer::spawn(DEFAULT_DEBOUNCE, handler);

        for query in ["s", "se", "seo", "seou", "seoul"] {
            debouncer.push(query.to_string());
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(*seen.lock(), vec!["seoul".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_input_fires_each_time() {
        let (seen, handler) = recording();
        let debouncer = Debouncer::spawn(DEFAULT_DEBOUNCE, handler);

        debouncer.push("busan".to_string());
        tokio::time::sleep(Duration::from_millis(350)).await;
        debouncer.push("daegu".to_string());
        tokio::time::sleep(Duration::from_millis(350)).await;

        assert_eq!(*seen.lock(), vec!["busan".to_string(), "daegu".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_value() {
        let (seen, handler) = recording();
        let debouncer = Debouncer::spawn(DEFAULT_DEBOUNCE, handler);

        debouncer.push("incheon".to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert!(seen.lock().is_empty());
        assert!(debouncer.is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_async_handler_runs_on_spawned_task() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let debouncer = Debouncer::spawn(DEFAULT_DEBOUNCE, move |value: String| {
            let sink = sink.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                sink.lock().push(value);
            }
        });

        debouncer.push("jeju".to_string());
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(*seen.lock(), vec!["jeju".to_string()]);
    }
}
