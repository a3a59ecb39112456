pub mod backoff;
mod outcome;
pub mod retry;
pub mod transport;

pub use backoff::{Sleeper, TokioSleeper};
pub use retry::generate_with_retry;
pub use transport::{HttpUpstream, InferenceCall, UpstreamCaller};

/// Short model label for log lines: the last path segment of the endpoint.
pub(crate) fn endpoint_label(url: &str) -> &str {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::endpoint_label;

    #[test]
    fn endpoint_label_uses_last_segment() {
        assert_eq!(
            endpoint_label("https://api-inference.huggingface.co/models/facebook/musicgen-small"),
            "musicgen-small"
        );
        assert_eq!(endpoint_label("http://127.0.0.1:9/models/x/"), "x");
    }
}
