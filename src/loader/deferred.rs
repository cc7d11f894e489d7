//! Pending-resolution handles for deferred loader data.
//!
//! A [`Deferred`] is returned by the loader in place of data that is still
//! being fetched. The fetch runs on its own task and publishes its value
//! through a watch channel, so the handle can be peeked without blocking
//! (to pick a loading fallback) or awaited (to stream the resolved value).

use std::future::Future;

use tokio::sync::watch;

/// Snapshot of a deferred value at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredState<T> {
    /// The producing task has not finished yet.
    Pending,
    /// The value is available.
    Resolved(T),
}

impl<T> DeferredState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, DeferredState::Pending)
    }
}

/// A value that settles independently of the response that carries it.
///
/// Cloning the handle is cheap and every clone observes the same value.
/// Dropping all handles does not cancel the producer; its result is
/// discarded when it arrives.
///
/// # Example
///
/// ```
/// use bunnyhop::loader::{Deferred, DeferredState};
///
/// # tokio_test::block_on(async {
/// let handle = Deferred::spawn(async { 42 });
/// assert_eq!(handle.resolved().await, Some(42));
/// assert_eq!(handle.state(), DeferredState::Resolved(42));
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct Deferred<T> {
    receiver: watch::Receiver<Option<T>>,
}

impl<T> Deferred<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Run `future` on a new task and return a handle to its output.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        let (sender, receiver) = watch::channel(None);

        tokio::spawn(async move {
            let value = future.await;
            // Fails only when every handle is gone.
            let _ = sender.send(Some(value));
        });

        Self { receiver }
    }

    /// A handle that is already resolved.
    pub fn ready(value: T) -> Self {
        let (_sender, receiver) = watch::channel(Some(value));
        Self { receiver }
    }

    /// Current state, without waiting.
    pub fn state(&self) -> DeferredState<T> {
        match &*self.receiver.borrow() {
            Some(value) => DeferredState::Resolved(value.clone()),
            None => DeferredState::Pending,
        }
    }

    /// Wait for the value.
    ///
    /// Returns `None` only if the producing task ended without publishing
    /// a value (it panicked or was aborted).
    pub async fn resolved(&self) -> Option<T> {
        let mut receiver = self.receiver.clone();
        let value = receiver
            .wait_for(Option::is_some)
            .await
            .map(|value| value.clone());
        value.ok().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::Notify;

    #[tokio::test]
    async fn test_ready_is_resolved_immediately() {
        let handle = Deferred::ready("done");
        assert_eq!(handle.state(), DeferredState::Resolved("done"));
        assert_eq!(handle.resolved().await, Some("done"));
    }

    #[tokio::test]
    async fn test_pending_until_producer_finishes() {
        let gate = Arc::new(Notify::new());
        let release = gate.clone();
        let handle = Deferred::spawn(async move {
            gate.notified().await;
            7u32
        });

        assert!(handle.state().is_pending());

        release.notify_one();
        assert_eq!(handle.resolved().await, Some(7));
        assert_eq!(handle.state(), DeferredState::Resolved(7));
    }

    #[tokio::test]
    async fn test_clones_share_the_value() {
        let handle = Deferred::spawn(async { vec![1, 2, 3] });
        let other = handle.clone();

        assert_eq!(other.resolved().await, Some(vec![1, 2, 3]));
        assert_eq!(handle.resolved().await, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_panicking_producer_resolves_to_none() {
        let handle: Deferred<u32> = Deferred::spawn(async {
            let value: Option<u32> = None;
            value.expect("producer blew up")
        });
        assert_eq!(handle.resolved().await, None);
        assert!(handle.state().is_pending());
    }

    #[tokio::test]
    async fn test_dropped_handle_does_not_cancel_producer() {
        let (tx, rx) = tokio::sync::oneshot::channel();
        let handle = Deferred::spawn(async move {
            tokio::task::yield_now().await;
            let _ = tx.send(());
            1u8
        });
        drop(handle);

        assert!(rx.await.is_ok());
    }
}
