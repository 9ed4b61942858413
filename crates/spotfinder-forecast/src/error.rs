//! Error types for forecast operations.

use thiserror::Error;

/// Forecast-specific errors.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// A required asset (model or feature spec) is missing, unreadable or malformed.
    #[error("Failed to load asset '{asset}': {message}")]
    AssetLoad { asset: String, message: String },

    /// The inference engine rejected the model binary.
    #[error("Model initialization failed: {message}")]
    ModelInit { message: String },

    /// Caller supplied a time outside the model domain.
    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: &'static str, message: String },

    /// The engine failed while running a forward pass.
    #[error("Inference failed: {message}")]
    Inference { message: String },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

impl ForecastError {
    pub(crate) fn asset(asset: impl Into<String>, message: impl std::fmt::Display) -> Self {
        ForecastError::AssetLoad {
            asset: asset.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn model_init(message: impl std::fmt::Display) -> Self {
        ForecastError::ModelInit {
            message: message.to_string(),
        }
    }

    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        ForecastError::InvalidInput {
            field,
            message: message.into(),
        }
    }

    /// True for errors the caller can recover from by re-prompting.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ForecastError::InvalidInput { .. })
    }
}

impl From<config::ConfigError> for ForecastError {
    fn from(err: config::ConfigError) -> Self {
        ForecastError::ConfigError {
            message: err.to_string(),
        }
    }
}

/// Result type for forecast operations.
pub type ForecastResult<T> = Result<T, ForecastError>;
