use bytes::Bytes;
use musicgen_core::{GenerationError, RetryPolicy, RetryStep};
use std::time::Instant;

use super::backoff::Sleeper;
use super::transport::{InferenceCall, UpstreamCaller};

/// Logs when the loop is dropped before reaching a terminal state, which is
/// what happens when the client disconnects mid-retry.
struct CancelGuard<'a> {
    model: &'a str,
    attempts: u32,
    finished: bool,
}

impl Drop for CancelGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            log::warn!(
                "generation cancelled: model={} attempts={}",
                self.model,
                self.attempts
            );
        }
    }
}

/// Calls the upstream until it yields audio, a fatal error, or the policy
/// runs out of attempts. Attempts are strictly sequential; the only
/// suspension points are the call itself and the backoff wait.
pub async fn generate_with_retry(
    caller: &dyn UpstreamCaller,
    sleeper: &dyn Sleeper,
    request: &InferenceCall<'_>,
    policy: &RetryPolicy,
) -> Result<Bytes, GenerationError> {
    if request.prompt.trim().is_empty() {
        return Err(GenerationError::Validation("prompt is required".to_string()));
    }
    let total = policy.max_attempts();
    let mut guard = CancelGuard {
        model: super::endpoint_label(request.url),
        attempts: 0,
        finished: false,
    };

    let mut attempt = 0u32;
    loop {
        attempt += 1;
        guard.attempts = attempt;
        let started_at = Instant::now();
        let outcome = caller.call(request).await;
        let elapsed_ms = started_at.elapsed().as_millis();
        log::info!(
            "generation attempt {}/{} model={} outcome={} elapsed_ms={}",
            attempt,
            total,
            guard.model,
            outcome.label(),
            elapsed_ms
        );

        match policy.next_step(attempt, outcome) {
            RetryStep::Done(body) => {
                guard.finished = true;
                log::info!(
                    "generation succeeded: model={} attempts={} size_kb={:.2}",
                    guard.model,
                    attempt,
                    body.len() as f64 / 1024.0
                );
                return Ok(body);
            }
            RetryStep::Fail(err) => {
                guard.finished = true;
                log::warn!(
                    "generation failed: model={} attempts={} err={}",
                    guard.model,
                    attempt,
                    err
                );
                return Err(err);
            }
            RetryStep::Wait { delay, condition } => {
                log::info!(
                    "generation retry scheduled: model={} wait_ms={} reason={}",
                    guard.model,
                    delay.as_millis(),
                    condition
                );
                sleeper.sleep(delay).await;
            }
        }
    }
}
