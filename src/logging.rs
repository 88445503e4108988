//! Tracing setup.
//!
//! The terminal is owned by the UI, so log lines go to a file.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::ClientError;

const DEFAULT_FILTER: &str = "info,reqwest=warn,tungstenite=warn";

/// Install the global subscriber, appending to `path`.
///
/// `RUST_LOG` overrides the default filter.
pub fn init(path: &Path) -> Result<(), ClientError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();

    Ok(())
}
