use std::path::Path;

use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

/// Loads `KEY=value` pairs from `path` into the process environment.
///
/// Returns whether a file was loaded; a missing file is not an error.
pub fn load_dotenv_file(path: &Path) -> bool {
    match dotenvy::from_path(path) {
        Ok(()) => true,
        Err(dotenvy::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => false,
        Err(err) => {
            eprintln!("failed to load environment file {}: {err}", path.display());
            false
        }
    }
}

pub fn log_dotenv_status(path: &Path, loaded: bool) {
    if loaded {
        info!("loaded environment file {}", path.display());
    } else if path.exists() {
        warn!("environment file {} was not applied", path.display());
    }
}
