use musicgen_service::{logging, process_env, AppConfig};

fn main() {
    logging::init_logging();
    process_env::load_env_from_exe_dir();
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("invalid configuration: {err}");
            std::process::exit(1);
        }
    };
    if let Err(err) = musicgen_service::start_server(config) {
        log::error!("service stopped: {err}");
        std::process::exit(1);
    }
}
