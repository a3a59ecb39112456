use std::io;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::upstream::{HttpUpstream, Sleeper, TokioSleeper, UpstreamCaller};

/// Per-process handles shared by every request. Nothing here is mutated
/// after startup.
#[derive(Clone)]
pub struct AppState {
    pub(crate) config: Arc<AppConfig>,
    pub(crate) caller: Arc<dyn UpstreamCaller>,
    pub(crate) sleeper: Arc<dyn Sleeper>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        caller: Arc<dyn UpstreamCaller>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            caller,
            sleeper,
        }
    }

    pub fn from_config(config: AppConfig) -> io::Result<Self> {
        let upstream = HttpUpstream::from_timeouts(config.connect_timeout, config.attempt_timeout)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        Ok(Self::new(config, Arc::new(upstream), Arc::new(TokioSleeper)))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
