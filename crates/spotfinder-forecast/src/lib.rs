//! Parking occupancy forecasting for MMCM SpotFinder.
//!
//! Turns a time of week into the feature vector the bundled model was
//! trained on, runs the model, and reports an occupancy percentage with the
//! model's fixed error figures.
//!
//! # Architecture
//!
//! - **FeatureSpec**: feature order and error constants from the bundled JSON
//! - **TimeInput**: validated (weekday, hour, minute), Mon..Sat only
//! - **TimeFeatureEncoder**: cyclical hour, AM flag, one-hot weekday, projected
//!   into the feature spec's order
//! - **InferenceEngine**: "run(vector) -> scalar" seam; **MlpEngine** is the
//!   candle implementation
//! - **Predictor**: owns spec + engine; `predict`, `predict_12h`, `release`
//!
//! # Example
//!
//! ```rust,ignore
//! use spotfinder_forecast::{ForecastConfig, Predictor};
//!
//! let predictor = Predictor::from_config(&ForecastConfig::load()?)?;
//! let p = predictor.predict_12h(0, 8, 30, true)?; // Monday 8:30 AM
//! println!("{}", p); // Predicted: 63.2%  |  Error: 6.42 pp
//! predictor.release();
//! ```

pub mod assets;
pub mod config;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod feature_spec;
pub mod predictor;
pub mod time;

pub use assets::{AssetSource, DirAssets, MemoryAssets};
pub use config::{ForecastConfig, InferenceConfig};
pub use encoder::TimeFeatureEncoder;
pub use engine::{InferenceEngine, MlpEngine};
pub use error::{ForecastError, ForecastResult};
pub use feature_spec::FeatureSpec;
pub use predictor::{Forecast, Prediction, Predictor};
pub use time::{Meridiem, TimeInput, Weekday};
