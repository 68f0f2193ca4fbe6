//! Cooperative cancellation for playback.
//!
//! Every suspension point in the sequencer and typewriter goes through
//! [`CancelToken::sleep`], which races the timer against cancellation. A
//! cancelled sleep drops its timer immediately.

use std::future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("playback cancelled")]
pub struct Cancelled;

/// Cloneable cancellation flag. All clones observe the same state.
#[derive(Debug, Clone)]
pub struct CancelToken {
    flag: Arc<watch::Sender<bool>>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        let (flag, _) = watch::channel(false);
        Self {
            flag: Arc::new(flag),
        }
    }

    pub fn cancel(&self) {
        self.flag.send_replace(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.flag.borrow()
    }

    /// Resolves once [`cancel`](Self::cancel) has been called on any clone.
    pub async fn cancelled(&self) {
        let mut rx = self.flag.subscribe();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            // Unreachable while `self` holds the sender.
            future::pending::<()>().await;
        }
    }

    /// Suspend for `duration` unless cancelled first.
    ///
    /// Cancellation is checked before the timer is armed, so an already
    /// cancelled token never sleeps. A zero duration still yields once.
    pub async fn sleep(&self, duration: Duration) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            return Err(Cancelled);
        }

        tokio::select! {
            biased;
            () = self.cancelled() => Err(Cancelled),
            () = tokio::time::sleep(duration) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::{CancelToken, Cancelled};

    #[tokio::test(start_paused = true)]
    async fn sleep_completes_when_not_cancelled() {
        let token = CancelToken::new();
        let start = Instant::now();
        assert_eq!(token.sleep(Duration::from_millis(250)).await, Ok(()));
        assert_eq!(start.elapsed(), Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_token_never_sleeps() {
        let token = CancelToken::new();
        token.cancel();
        let start = Instant::now();
        assert_eq!(token.sleep(Duration::from_secs(60)).await, Err(Cancelled));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_interrupts_pending_sleep() {
        let token = CancelToken::new();
        let clone = token.clone();
        let start = Instant::now();

        let sleeper = tokio::spawn(async move { clone.sleep(Duration::from_secs(60)).await });
        tokio::time::sleep(Duration::from_millis(100)).await;
        token.cancel();

        assert_eq!(sleeper.await.expect("task joins"), Err(Cancelled));
        assert!(start.elapsed() < Duration::from_secs(60));
        assert!(token.is_cancelled());
    }
}
