use musicgen_core::registry::DEFAULT_INFERENCE_BASE_URL;
use musicgen_core::{GenerationParameters, ModelRegistry, RetryPolicy};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_API_KEY: &str = "HUGGINGFACE_API_KEY";
const ENV_PORT: &str = "PORT";
const ENV_HOST: &str = "HOST";
const ENV_PLATFORM: &str = "MUSICGEN_PLATFORM";
const ENV_CORS: &str = "MUSICGEN_CORS";
const ENV_STATIC_DIR: &str = "MUSICGEN_STATIC_DIR";
const ENV_ENABLE_AUDIOLDM2: &str = "MUSICGEN_ENABLE_AUDIOLDM2";
const ENV_INFERENCE_BASE_URL: &str = "MUSICGEN_INFERENCE_BASE_URL";
const ENV_MAX_ATTEMPTS: &str = "MUSICGEN_MAX_ATTEMPTS";
const ENV_LOADING_BACKOFF_MS: &str = "MUSICGEN_LOADING_BACKOFF_MS";
const ENV_TRANSPORT_BACKOFF_MS: &str = "MUSICGEN_TRANSPORT_BACKOFF_MS";
const ENV_UPSTREAM_TIMEOUT_SECS: &str = "MUSICGEN_UPSTREAM_TIMEOUT_SECS";
const ENV_CONNECT_TIMEOUT_SECS: &str = "MUSICGEN_CONNECT_TIMEOUT_SECS";

pub const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PLATFORM: &str = "standalone";
const DEFAULT_MAX_ATTEMPTS: u64 = 5;
const DEFAULT_LOADING_BACKOFF_MS: u64 = 5_000;
const DEFAULT_TRANSPORT_BACKOFF_MS: u64 = 2_000;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 60;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 15;

/// Process-wide settings, built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub addr: String,
    pub credential: Option<String>,
    pub registry: ModelRegistry,
    pub cors_enabled: bool,
    pub platform: String,
    pub static_dir: Option<PathBuf>,
    pub retry_policy: RetryPolicy,
    pub attempt_timeout: Duration,
    pub connect_timeout: Duration,
    pub parameters: GenerationParameters,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvReader { lookup };
        let host = env
            .non_empty(ENV_HOST)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = env.parsed_or(ENV_PORT, DEFAULT_PORT);
        let base_url = env
            .non_empty(ENV_INFERENCE_BASE_URL)
            .unwrap_or_else(|| DEFAULT_INFERENCE_BASE_URL.to_string());
        let registry = ModelRegistry::standard(&base_url, env.flag_or(ENV_ENABLE_AUDIOLDM2, false))?;
        let max_attempts = env
            .parsed_or(ENV_MAX_ATTEMPTS, DEFAULT_MAX_ATTEMPTS)
            .min(u64::from(u32::MAX)) as u32;
        let retry_policy = RetryPolicy::new(
            max_attempts,
            Duration::from_millis(env.parsed_or(ENV_LOADING_BACKOFF_MS, DEFAULT_LOADING_BACKOFF_MS)),
            Duration::from_millis(env.parsed_or(ENV_TRANSPORT_BACKOFF_MS, DEFAULT_TRANSPORT_BACKOFF_MS)),
        );

        Ok(Self {
            addr: format_addr(&host, port),
            credential: env.non_empty(ENV_API_KEY),
            registry,
            cors_enabled: env.flag_or(ENV_CORS, true),
            platform: env
                .non_empty(ENV_PLATFORM)
                .unwrap_or_else(|| DEFAULT_PLATFORM.to_string()),
            static_dir: env.non_empty(ENV_STATIC_DIR).map(PathBuf::from),
            retry_policy,
            attempt_timeout: Duration::from_secs(
                env.parsed_or(ENV_UPSTREAM_TIMEOUT_SECS, DEFAULT_UPSTREAM_TIMEOUT_SECS).max(1),
            ),
            connect_timeout: Duration::from_secs(
                env.parsed_or(ENV_CONNECT_TIMEOUT_SECS, DEFAULT_CONNECT_TIMEOUT_SECS).max(1),
            ),
            parameters: GenerationParameters::default(),
        })
    }

    pub fn credential_configured(&self) -> bool {
        self.credential.is_some()
    }
}

fn format_addr(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        return format!("[{host}]:{port}");
    }
    format!("{host}:{port}")
}

struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn non_empty(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn parsed_or<T: std::str::FromStr>(&self, name: &str, default: T) -> T {
        self.non_empty(name)
            .and_then(|value| value.parse::<T>().ok())
            .unwrap_or(default)
    }

    fn flag_or(&self, name: &str, default: bool) -> bool {
        match self.non_empty(name) {
            Some(value) => !matches!(
                value.to_ascii_lowercase().as_str(),
                "0" | "false" | "off" | "no"
            ),
            None => default,
        }
    }
}
