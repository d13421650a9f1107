use std::future::Future;

use tokio::{sync::oneshot, task::JoinHandle};
use tokio_util::sync::CancellationToken;

/// A job running on its own Tokio task whose single result arrives through a
/// oneshot channel. Cancelling drops the job's future at its next await point.
#[derive(Debug)]
pub struct AsyncOnce<T> {
    pub thread: JoinHandle<()>,
    pub receiver: oneshot::Receiver<T>,
    pub cancel_token: CancellationToken,
}

impl<T> AsyncOnce<T> {
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    /// Waits for the result. Fails with `JobCancelled` if the job was
    /// cancelled (or panicked) before sending anything. Cancel safe, the
    /// result can still be received after dropping this future.
    pub async fn recv(&mut self) -> crate::Result<T> {
        (&mut self.receiver)
            .await
            .map_err(|_| crate::Error::JobCancelled)
    }
}

/// Starts `job` on a separate Tokio task that runs once.
pub fn async_once_thread<R, F, Fut>(job: F) -> AsyncOnce<R>
where
    R: Send + 'static,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = R> + Send + 'static,
{
    let cancel_token = CancellationToken::new();
    let (tr, rc) = oneshot::channel();
    let cancel_token_clone = cancel_token.clone();

    let thread = tokio::spawn(async move {
        tokio::select! {
            _ = cancel_token_clone.cancelled() => (),
            result = job() => {
                let _ = tr.send(result);
            }
        };
    });

    AsyncOnce {
        thread,
        receiver: rc,
        cancel_token,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_result_is_delivered() {
        let mut job = async_once_thread(|| async { 21 * 2 });
        assert_eq!(job.recv().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_cancelled_job_yields_error() {
        let mut job = async_once_thread(|| async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            1
        });
        job.cancel();
        assert!(matches!(job.recv().await, Err(crate::Error::JobCancelled)));
    }

    #[tokio::test]
    async fn test_recv_survives_a_dropped_wait() {
        let mut job = async_once_thread(|| async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            7
        });

        let timed_out = tokio::time::timeout(Duration::from_millis(5), job.recv()).await;
        assert!(timed_out.is_err());
        assert_eq!(job.recv().await.unwrap(), 7);
    }
}
