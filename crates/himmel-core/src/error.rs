//! Application-level error taxonomy.
//!
//! Domain errors bubble up unchanged and keep their own `user_message`
//! text; this enum is the single roof the binary matches on.

use himmel_weather::{LocationError, RefreshError, WeatherError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Location error: {0}")]
    Location(#[from] LocationError),

    #[error("Weather error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Refresh error: {0}")]
    Refresh(#[from] RefreshError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Stable text for the UI; details stay in logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Location(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
            AppError::Refresh(e) => e.user_message(),
            AppError::Config(_) => "Invalid configuration. Check your settings.",
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}
