//! Application plumbing for himmel: configuration, the app-level error
//! taxonomy, and process initialization.

pub mod config;
pub mod error;

pub use config::{Config, ConfigValidationError, ValidationResult};
pub use error::AppError;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialize logging for the process.
///
/// Honors `RUST_LOG`; defaults to `info`.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("himmel core initialized");
    Ok(())
}
