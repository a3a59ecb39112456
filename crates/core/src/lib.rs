pub mod api;
pub mod error;
pub mod outcome;
pub mod policy;
pub mod registry;
pub mod request;

pub use error::GenerationError;
pub use outcome::{classify_failure, RetryCondition, UpstreamOutcome};
pub use policy::{RetryPolicy, RetryStep};
pub use registry::{ModelEntry, ModelRegistry};
pub use request::{GenerationParameters, GenerationRequest, InferencePayload};

pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
