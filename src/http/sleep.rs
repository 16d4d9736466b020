//! Backoff sleeping
//!
//! The transport never calls `tokio::time::sleep` directly. It goes through a
//! `Sleeper` so tests can observe requested waits without real delays.

use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Suspends the current call for a rate-limit wait
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Real wall-clock sleeping on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Records every requested wait and returns immediately
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits requested so far, in order
    pub fn waits(&self) -> Vec<Duration> {
        self.waits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Sum of all requested waits
    pub fn total(&self) -> Duration {
        self.waits().iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(duration);
    }
}

#[cfg(test)]
mod sleep_tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_sleeper_records_in_order() {
        let sleeper = RecordingSleeper::new();
        sleeper.sleep(Duration::from_secs(2)).await;
        sleeper.sleep(Duration::from_secs(60)).await;

        assert_eq!(
            sleeper.waits(),
            vec![Duration::from_secs(2), Duration::from_secs(60)]
        );
        assert_eq!(sleeper.total(), Duration::from_secs(62));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_sleeper_advances_clock() {
        let start = tokio::time::Instant::now();
        TokioSleeper.sleep(Duration::from_secs(5)).await;
        assert!(start.elapsed() >= Duration::from_secs(5));
    }
}
