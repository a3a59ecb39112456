use async_trait::async_trait;
use std::time::Duration;

/// Suspension point between retry attempts. Injected so tests can record
/// the requested waits instead of sleeping.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Sleeper, TokioSleeper};
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn tokio_sleeper_waits_at_least_the_delay() {
        let started = Instant::now();
        TokioSleeper.sleep(Duration::from_millis(20)).await;
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn zero_delay_returns_immediately() {
        let started = Instant::now();
        TokioSleeper.sleep(Duration::ZERO).await;
        assert!(started.elapsed() < Duration::from_millis(20));
    }
}
