use async_trait::async_trait;
use musicgen_core::{GenerationParameters, InferencePayload, UpstreamOutcome};
use reqwest::header::USER_AGENT;
use reqwest::Client;
use std::time::Duration;

use super::outcome::{read_outcome, transport_outcome};

const UPSTREAM_USER_AGENT: &str = concat!("musicgen-proxy/", env!("CARGO_PKG_VERSION"));

/// One outbound inference call.
#[derive(Debug, Clone, Copy)]
pub struct InferenceCall<'a> {
    pub url: &'a str,
    pub prompt: &'a str,
    pub credential: &'a str,
    pub parameters: GenerationParameters,
}

/// Performs a single attempt against the inference endpoint and classifies
/// the response. Implementations must not retry on their own.
#[async_trait]
pub trait UpstreamCaller: Send + Sync {
    async fn call(&self, request: &InferenceCall<'_>) -> UpstreamOutcome;
}

#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: Client,
    attempt_timeout: Duration,
}

impl HttpUpstream {
    pub fn new(client: Client, attempt_timeout: Duration) -> Self {
        Self {
            client,
            attempt_timeout,
        }
    }

    pub fn from_timeouts(connect_timeout: Duration, attempt_timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self::new(build_upstream_client(connect_timeout)?, attempt_timeout))
    }
}

#[async_trait]
impl UpstreamCaller for HttpUpstream {
    async fn call(&self, request: &InferenceCall<'_>) -> UpstreamOutcome {
        let payload = InferencePayload::new(request.prompt, request.parameters);
        let sent = self
            .client
            .post(request.url)
            .bearer_auth(request.credential)
            .header(USER_AGENT, UPSTREAM_USER_AGENT)
            .timeout(self.attempt_timeout)
            .json(&payload)
            .send()
            .await;
        match sent {
            Ok(response) => read_outcome(response).await,
            Err(err) => transport_outcome(&err),
        }
    }
}

/// Shared pooled client; the per-attempt bound is applied on each request.
pub(crate) fn build_upstream_client(connect_timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .connect_timeout(connect_timeout)
        .pool_max_idle_per_host(8)
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .tcp_keepalive(Some(Duration::from_secs(30)))
        .build()
}
