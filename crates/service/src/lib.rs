pub mod config;
mod http;
pub mod logging;
pub mod process_env;
pub mod upstream;

pub use config::AppConfig;
pub use http::{build_router, AppState};

use std::io;

fn log_startup(config: &AppConfig) {
    log::info!(
        "musicgen-proxy v{} starting: platform={} addr={} models={} credential_configured={}",
        musicgen_core::core_version(),
        config.platform,
        config.addr,
        config.registry.model_ids().join(","),
        config.credential_configured()
    );
    if !config.credential_configured() {
        log::warn!(
            "{} is not set; generation requests will be rejected",
            config::ENV_API_KEY
        );
    }
    if let Some(dir) = config.static_dir.as_ref() {
        log::info!("serving static files from {}", dir.display());
    }
}

/// Blocks the calling thread until Ctrl-C or SIGTERM.
pub fn start_server(config: AppConfig) -> io::Result<()> {
    log_startup(&config);
    let addr = config.addr.clone();
    let state = AppState::from_config(config)?;
    http::server::start_http(&addr, state)
}
