use std::future::Future;

use tokio::sync::watch;

use crate::domain::monitor::error::{MonitorError, MonitorResult};

/// Cooperative cancellation for a query run, fired by sending `true`.
#[derive(Clone, Debug, Default)]
pub struct CancelSignal {
    rx: Option<watch::Receiver<bool>>,
}

impl CancelSignal {
    pub fn new(rx: watch::Receiver<bool>) -> Self {
        Self { rx: Some(rx) }
    }

    /// Signal that never fires.
    pub fn never() -> Self {
        Self::default()
    }

    pub fn channel() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (tx, Self::new(rx))
    }

    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().map(|rx| *rx.borrow()).unwrap_or(false)
    }

    /// Resolves once the signal fires. Pending forever if the sender is gone.
    pub async fn cancelled(&self) {
        if let Some(rx) = &self.rx {
            let mut rx = rx.clone();
            if rx.wait_for(|cancelled| *cancelled).await.is_ok() {
                return;
            }
        }
        std::future::pending::<()>().await
    }

    /// Runs `fut` unless the signal fires first.
    pub async fn guard<T, F>(&self, fut: F) -> MonitorResult<T>
    where
        F: Future<Output = MonitorResult<T>>,
    {
        if self.is_cancelled() {
            return Err(MonitorError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(MonitorError::Cancelled),
            result = fut => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn never_signal_lets_work_finish() {
        let signal = CancelSignal::never();
        assert!(!signal.is_cancelled());
        assert_eq!(signal.guard(async { Ok(7) }).await, Ok(7));
    }

    #[tokio::test]
    async fn fired_signal_short_circuits() {
        let (tx, signal) = CancelSignal::channel();
        tx.send(true).unwrap();
        assert!(signal.is_cancelled());
        let result: MonitorResult<()> = signal.guard(async { Ok(()) }).await;
        assert_eq!(result, Err(MonitorError::Cancelled));
    }

    #[tokio::test]
    async fn firing_mid_flight_cancels_pending_work() {
        let (tx, signal) = CancelSignal::channel();
        let pending = signal.guard(std::future::pending::<MonitorResult<()>>());
        let fire = async {
            tx.send(true).unwrap();
        };
        let (result, _) = tokio::join!(pending, fire);
        assert_eq!(result, Err(MonitorError::Cancelled));
    }
}
