pub mod action;

pub use action::ActionService;

use std::sync::{Arc, atomic};

use eyre::{Result, eyre};
use std::time::Duration;
use tokio::sync::oneshot;

/// Waits for the background tasks still in flight once the service loop
/// has been cancelled.
pub struct ShutdownCoordinator {
    pub pending_tasks: Arc<atomic::AtomicUsize>,
    pub shutdown_complete: oneshot::Sender<Result<()>>,
    pub timeout: Option<Duration>,
}

impl ShutdownCoordinator {
    pub async fn wait_for_completion(self) -> Result<()> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(15));
        let result = match tokio::time::timeout(timeout, self.wait_pending_tasks()).await {
            Ok(_) => Ok(()),
            Err(_) => Err(eyre!("shutdown timeout reached")),
        };
        let _ = self.shutdown_complete.send(result);
        Ok(())
    }

    async fn wait_pending_tasks(&self) {
        while self.pending_tasks.load(atomic::Ordering::SeqCst) > 0 {
            log::debug!(
                "Waiting for {} pending tasks",
                self.pending_tasks.load(atomic::Ordering::SeqCst)
            );
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_waits_for_pending_tasks() {
        let pending_tasks = Arc::new(atomic::AtomicUsize::new(1));
        let (tx, rx) = oneshot::channel();
        let coordinator = ShutdownCoordinator {
            pending_tasks: pending_tasks.clone(),
            shutdown_complete: tx,
            timeout: Some(Duration::from_secs(5)),
        };

        let handle = tokio::spawn(coordinator.wait_for_completion());
        tokio::time::sleep(Duration::from_millis(150)).await;
        pending_tasks.store(0, atomic::Ordering::SeqCst);

        handle.await.unwrap().unwrap();
        assert!(rx.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_shutdown_times_out() {
        let (tx, rx) = oneshot::channel();
        let coordinator = ShutdownCoordinator {
            pending_tasks: Arc::new(atomic::AtomicUsize::new(1)),
            shutdown_complete: tx,
            timeout: Some(Duration::from_millis(200)),
        };

        coordinator.wait_for_completion().await.unwrap();
        let err = rx.await.unwrap().unwrap_err();
        assert_eq!(err.to_string(), "shutdown timeout reached");
    }
}
