//! Race a future against a deadline.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation still pending after {0:?}")]
pub struct TimedOut(pub Duration);

/// Await `operation` for at most `limit`.
///
/// Whichever settles first wins. The operation is dropped on timeout; if it
/// is a handle to spawned work (a `JoinHandle` or a shared prefetch), that
/// work keeps running and its result is simply never observed here.
pub async fn await_with_timeout<F>(operation: F, limit: Duration) -> Result<F::Output, TimedOut>
where
    F: Future,
{
    tokio::time::timeout(limit, operation)
        .await
        .map_err(|_| TimedOut(limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn returns_value_when_operation_wins() {
        let result = await_with_timeout(
            async {
                sleep(Duration::from_secs(1)).await;
                7
            },
            Duration::from_secs(3),
        )
        .await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_when_deadline_wins() {
        let result = await_with_timeout(
            sleep(Duration::from_secs(10)),
            Duration::from_secs(3),
        )
        .await;
        assert_eq!(result, Err(TimedOut(Duration::from_secs(3))));
    }

    #[tokio::test(start_paused = true)]
    async fn spawned_loser_keeps_running() {
        let (tx, rx) = tokio::sync::oneshot::channel();
        let task = tokio::spawn(async move {
            sleep(Duration::from_secs(5)).await;
            let _ = tx.send("done");
        });

        let raced = await_with_timeout(task, Duration::from_secs(1)).await;
        assert!(raced.is_err());
        assert_eq!(rx.await, Ok("done"));
    }
}
