use std::path::{Path, PathBuf};

const ENV_CANDIDATES: [&str; 2] = ["musicgen.env", ".env"];

pub(crate) fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn find_env_file_in_dir(dir: &Path) -> Option<PathBuf> {
    ENV_CANDIDATES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Applies `KEY=value` pairs from `path` without overriding variables that
/// are already set. Returns how many were applied.
pub(crate) fn apply_env_file(path: &Path) -> usize {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(err) => {
            log::warn!("env file unreadable: {} ({})", path.display(), err);
            return 0;
        }
    };
    let mut applied = 0usize;
    for item in iter {
        let (key, value) = match item {
            Ok(pair) => pair,
            Err(err) => {
                log::warn!("env file line skipped: {} ({})", path.display(), err);
                continue;
            }
        };
        if std::env::var_os(&key).is_some() {
            continue;
        }
        std::env::set_var(key, value);
        applied += 1;
    }
    applied
}

pub fn load_env_from_exe_dir() {
    let dir = exe_dir();
    let Some(path) = find_env_file_in_dir(&dir) else {
        return;
    };
    let applied = apply_env_file(&path);
    if applied > 0 {
        log::info!("Loaded {} env vars from {}", applied, path.display());
    }
}
