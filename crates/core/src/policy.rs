use bytes::Bytes;
use std::time::Duration;

use crate::error::GenerationError;
use crate::outcome::{RetryCondition, UpstreamOutcome};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_LOADING_BACKOFF_STEP: Duration = Duration::from_secs(5);
pub const DEFAULT_TRANSPORT_BACKOFF_STEP: Duration = Duration::from_secs(2);

/// Linear backoff policy: the wait after attempt `n` (1-based) is `step × n`,
/// with separate steps for cold-start and transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    loading_step: Duration,
    transport_step: Duration,
}

/// Transition out of `Attempting(n)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryStep {
    Done(Bytes),
    Fail(GenerationError),
    Wait {
        delay: Duration,
        condition: RetryCondition,
    },
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_ATTEMPTS,
            DEFAULT_LOADING_BACKOFF_STEP,
            DEFAULT_TRANSPORT_BACKOFF_STEP,
        )
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, loading_step: Duration, transport_step: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            loading_step,
            transport_step,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn loading_backoff(&self, attempt: u32) -> Duration {
        self.loading_step.saturating_mul(attempt.max(1))
    }

    pub fn transport_backoff(&self, attempt: u32) -> Duration {
        self.transport_step.saturating_mul(attempt.max(1))
    }

    pub fn next_step(&self, attempt: u32, outcome: UpstreamOutcome) -> RetryStep {
        let condition = match outcome {
            UpstreamOutcome::Success(body) => return RetryStep::Done(body),
            UpstreamOutcome::FatalError { status, message } => {
                return RetryStep::Fail(GenerationError::FatalUpstream { status, message })
            }
            UpstreamOutcome::LoadingRetryable(message) => RetryCondition::Loading(message),
            UpstreamOutcome::TransportError(message) => RetryCondition::Transport(message),
        };
        if attempt >= self.max_attempts {
            return RetryStep::Fail(GenerationError::ExhaustedRetries {
                attempts: attempt,
                last: condition,
            });
        }
        let delay = if condition.is_loading() {
            self.loading_backoff(attempt)
        } else {
            self.transport_backoff(attempt)
        };
        RetryStep::Wait { delay, condition }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_attempts_is_clamped_to_one() {
        let policy = RetryPolicy::new(0, Duration::from_secs(1), Duration::from_secs(1));
        assert_eq!(policy.max_attempts(), 1);
        let step = policy.next_step(1, UpstreamOutcome::LoadingRetryable("loading".to_string()));
        assert!(matches!(
            step,
            RetryStep::Fail(GenerationError::ExhaustedRetries { attempts: 1, .. })
        ));
    }

    #[test]
    fn loading_backoff_grows_by_five_seconds() {
        let policy = RetryPolicy::default();
        let waits: Vec<u64> = (1..=4).map(|n| policy.loading_backoff(n).as_secs()).collect();
        assert_eq!(waits, vec![5, 10, 15, 20]);
    }

    #[test]
    fn transport_backoff_is_independent_of_loading() {
        let policy = RetryPolicy::default();
        let waits: Vec<u64> = (1..=3).map(|n| policy.transport_backoff(n).as_secs()).collect();
        assert_eq!(waits, vec![2, 4, 6]);
    }

    #[test]
    fn fatal_stops_on_first_attempt() {
        let step = RetryPolicy::default().next_step(
            1,
            UpstreamOutcome::FatalError {
                status: 401,
                message: "unauthorized".to_string(),
            },
        );
        assert_eq!(
            step,
            RetryStep::Fail(GenerationError::FatalUpstream {
                status: 401,
                message: "unauthorized".to_string()
            })
        );
    }

    #[test]
    fn transport_waits_use_transport_step() {
        let step = RetryPolicy::default()
            .next_step(2, UpstreamOutcome::TransportError("timed out".to_string()));
        assert_eq!(
            step,
            RetryStep::Wait {
                delay: Duration::from_secs(4),
                condition: RetryCondition::Transport("timed out".to_string()),
            }
        );
    }

    #[test]
    fn last_attempt_exhausts_without_waiting() {
        let step = RetryPolicy::default()
            .next_step(5, UpstreamOutcome::LoadingRetryable("loading".to_string()));
        assert_eq!(
            step,
            RetryStep::Fail(GenerationError::ExhaustedRetries {
                attempts: 5,
                last: RetryCondition::Loading("loading".to_string()),
            })
        );
    }

    #[test]
    fn success_returns_body_untouched() {
        let body = Bytes::from_static(b"fLaC\x00\x00\x00\x22");
        let step = RetryPolicy::default().next_step(3, UpstreamOutcome::Success(body.clone()));
        assert_eq!(step, RetryStep::Done(body));
    }
}
