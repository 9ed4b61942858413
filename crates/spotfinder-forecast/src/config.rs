//! Configuration for the forecast predictor.
//!
//! # Loading Configuration
//!
//! ```rust,ignore
//! use spotfinder_forecast::ForecastConfig;
//!
//! // Layered: config/default.toml, config/{SPOTFINDER_ENV}.toml, SPOTFINDER__* env vars
//! let config = ForecastConfig::load()?;
//!
//! // Or a single file
//! let config = ForecastConfig::from_file(Path::new("spotfinder.toml"))?;
//! ```
//!
//! # TOML Structure
//!
//! ```toml
//! [assets]
//! dir = "./assets"
//! model_file = "parking_timeonly.safetensors"
//! spec_file = "feature_spec_timeonly.json"
//!
//! [inference]
//! use_accelerator = true
//! device_ordinal = 0
//!
//! [logging]
//! level = "info"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, ForecastResult};

/// Default model asset bundled with the app.
pub const DEFAULT_MODEL_FILE: &str = "parking_timeonly.safetensors";

/// Default feature specification asset bundled with the app.
pub const DEFAULT_SPEC_FILE: &str = "feature_spec_timeonly.json";

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ForecastConfig {
    #[serde(default)]
    pub assets: AssetConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ForecastConfig {
    /// Load configuration from files and environment.
    ///
    /// Configuration is loaded in order:
    /// 1. config/default.toml (base settings)
    /// 2. config/{SPOTFINDER_ENV}.toml (environment-specific)
    /// 3. Environment variables with SPOTFINDER_ prefix, `__` as separator
    pub fn load() -> ForecastResult<Self> {
        let env = std::env::var("SPOTFINDER_ENV").unwrap_or_else(|_| "development".to_string());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(config::Environment::with_prefix("SPOTFINDER").separator("__"));

        let config: ForecastConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> ForecastResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ForecastError::ConfigError {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: ForecastConfig =
            toml::from_str(&content).map_err(|e| ForecastError::ConfigError {
                message: format!("Failed to parse config file: {}", e),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> ForecastResult<()> {
        if self.assets.model_file.trim().is_empty() {
            return Err(ForecastError::ConfigError {
                message: "assets.model_file cannot be empty".into(),
            });
        }
        if self.assets.spec_file.trim().is_empty() {
            return Err(ForecastError::ConfigError {
                message: "assets.spec_file cannot be empty".into(),
            });
        }
        if self.logging.level.trim().is_empty() {
            return Err(ForecastError::ConfigError {
                message: "logging.level cannot be empty".into(),
            });
        }
        Ok(())
    }
}

/// Where the bundled model and feature spec live.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetConfig {
    /// Directory holding the assets. Relative paths resolve from the working directory.
    #[serde(default = "default_assets_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_model_file")]
    pub model_file: String,
    #[serde(default = "default_spec_file")]
    pub spec_file: String,
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("./assets")
}

fn default_model_file() -> String {
    DEFAULT_MODEL_FILE.to_string()
}

fn default_spec_file() -> String {
    DEFAULT_SPEC_FILE.to_string()
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            dir: default_assets_dir(),
            model_file: default_model_file(),
            spec_file: default_spec_file(),
        }
    }
}

/// Inference device selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InferenceConfig {
    /// Prefer an accelerated device when one is available.
    /// A performance hint only; CPU is always a valid fallback.
    #[serde(default = "default_use_accelerator")]
    pub use_accelerator: bool,
    #[serde(default)]
    pub device_ordinal: usize,
}

fn default_use_accelerator() -> bool {
    true
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            use_accelerator: default_use_accelerator(),
            device_ordinal: 0,
        }
    }
}

impl InferenceConfig {
    /// CPU-only inference.
    pub fn cpu() -> Self {
        Self {
            use_accelerator: false,
            device_ordinal: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ForecastConfig::default();
        assert_eq!(config.assets.model_file, DEFAULT_MODEL_FILE);
        assert_eq!(config.assets.spec_file, DEFAULT_SPEC_FILE);
        assert!(config.inference.use_accelerator);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_fails_empty_spec_file() {
        let mut config = ForecastConfig::default();
        config.assets.spec_file = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("spec_file"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ForecastConfig = toml::from_str(
            r#"
            [inference]
            use_accelerator = false
            "#,
        )
        .expect("partial config must parse");

        assert!(!config.inference.use_accelerator);
        assert_eq!(config.assets.dir, PathBuf::from("./assets"));
        assert_eq!(config.assets.model_file, DEFAULT_MODEL_FILE);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("spotfinder.toml");
        std::fs::write(
            &path,
            "[assets]\ndir = \"/opt/spotfinder\"\n\n[logging]\nlevel = \"debug\"\n",
        )
        .expect("write config");

        let config = ForecastConfig::from_file(&path).expect("config loads");
        assert_eq!(config.assets.dir, PathBuf::from("/opt/spotfinder"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_from_file_missing() {
        let err = ForecastConfig::from_file(Path::new("/nonexistent/spotfinder.toml")).unwrap_err();
        assert!(matches!(err, ForecastError::ConfigError { .. }));
    }
}
