use thiserror::Error;

use crate::outcome::RetryCondition;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("{0}")]
    Validation(String),
    #[error("upstream credential is not configured")]
    Configuration,
    #[error("upstream error {status}: {message}")]
    FatalUpstream { status: u16, message: String },
    #[error("gave up after {attempts} attempts: {last}")]
    ExhaustedRetries { attempts: u32, last: RetryCondition },
}

impl GenerationError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Configuration => "configuration_error",
            Self::FatalUpstream { .. } => "upstream_error",
            Self::ExhaustedRetries { .. } => "exhausted_retries",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Configuration | Self::FatalUpstream { .. } => 500,
            Self::ExhaustedRetries { last, .. } if last.is_loading() => 503,
            Self::ExhaustedRetries { .. } => 500,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::ExhaustedRetries { last, .. } if last.is_loading())
    }

    pub fn summary(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Invalid request",
            Self::Configuration => "Server configuration error",
            Self::FatalUpstream { .. } | Self::ExhaustedRetries { .. } => "Generation failed",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            Self::Validation(_) => "the prompt field must be a non-empty string",
            Self::Configuration => {
                "set HUGGINGFACE_API_KEY in the deployment environment (https://huggingface.co/settings/tokens)"
            }
            Self::FatalUpstream { status: 401 | 403, .. } => {
                "the upstream rejected the credential; check HUGGINGFACE_API_KEY"
            }
            Self::FatalUpstream { .. } => "the upstream refused the request; check the prompt and model",
            Self::ExhaustedRetries { last, .. } if last.is_loading() => {
                "the model is still loading; wait about 30 seconds and retry"
            }
            Self::ExhaustedRetries { .. } => "check the network connection or retry later",
        }
    }
}
