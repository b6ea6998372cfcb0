#![forbid(unsafe_code)]

//! Log file setup.
//!
//! The terminal belongs to the UI, so logs only go to a file and only when
//! one is configured.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "debug";

/// Install a global `fmt` subscriber writing to `path`.
///
/// The filter comes from `RUST_LOG` and falls back to `debug`. A subscriber
/// that is already installed is left in place.
pub fn init_file_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init();
    tracing::info!(path = %path.display(), "logging started");
    Ok(())
}
