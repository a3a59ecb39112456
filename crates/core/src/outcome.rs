use bytes::Bytes;

const LOADING_STATUS: u16 = 503;
const LOADING_MARKER: &str = "loading";

/// Classified result of one upstream attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamOutcome {
    Success(Bytes),
    LoadingRetryable(String),
    FatalError { status: u16, message: String },
    TransportError(String),
}

impl UpstreamOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::LoadingRetryable(_) => "loading",
            Self::FatalError { .. } => "fatal",
            Self::TransportError(_) => "transport",
        }
    }
}

/// Non-terminal condition the retry loop can recover from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryCondition {
    Loading(String),
    Transport(String),
}

impl RetryCondition {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading(_))
    }
}

impl std::fmt::Display for RetryCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading(message) => write!(f, "model loading: {message}"),
            Self::Transport(message) => write!(f, "transport error: {message}"),
        }
    }
}

/// Status 503 is the primary cold-start signal; the lowercase `loading`
/// marker in the body is kept as a secondary match.
pub fn is_loading_failure(status: u16, body: &str) -> bool {
    status == LOADING_STATUS || body.contains(LOADING_MARKER)
}

pub fn classify_failure(status: u16, body: String) -> UpstreamOutcome {
    if is_loading_failure(status, &body) {
        UpstreamOutcome::LoadingRetryable(body)
    } else {
        UpstreamOutcome::FatalError {
            status,
            message: body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_503_is_loading_regardless_of_body() {
        assert!(matches!(
            classify_failure(503, String::new()),
            UpstreamOutcome::LoadingRetryable(_)
        ));
    }

    #[test]
    fn loading_marker_in_body_is_loading() {
        let body = r#"{"error":"Model facebook/musicgen-medium is currently loading","estimated_time":20.0}"#;
        assert!(matches!(
            classify_failure(500, body.to_string()),
            UpstreamOutcome::LoadingRetryable(_)
        ));
    }

    #[test]
    fn loading_marker_is_case_sensitive() {
        assert_eq!(
            classify_failure(500, "Model is LOADING".to_string()),
            UpstreamOutcome::FatalError {
                status: 500,
                message: "Model is LOADING".to_string()
            }
        );
    }

    #[test]
    fn unauthorized_is_fatal() {
        let outcome = classify_failure(401, r#"{"error":"Invalid credentials"}"#.to_string());
        assert!(matches!(outcome, UpstreamOutcome::FatalError { status: 401, .. }));
        assert_eq!(outcome.label(), "fatal");
    }
}
