//! Parking occupancy predictor.
//!
//! Owns the loaded model and the feature spec. Construction reads both
//! assets once; afterwards every call is a pure encode → infer → clamp.
//!
//! # Lifecycle
//!
//! ```rust,ignore
//! let predictor = Predictor::from_config(&ForecastConfig::load()?)?;
//! let prediction = predictor.predict(0, 8, 30)?; // Monday 08:30
//! predictor.release();
//! ```
//!
//! `release` consumes the predictor, so calls after teardown do not compile.
//! Dropping it on an early return frees the same resources.
//!
//! # Thread Safety
//! `predict` takes `&self` and blocks for one forward pass. There is no
//! internal locking; callers sharing one instance across threads serialize
//! access themselves.

mod types;

#[cfg(test)]
mod tests;

pub use types::{Forecast, Prediction};

use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::assets::{AssetSource, DirAssets};
use crate::config::{ForecastConfig, InferenceConfig};
use crate::encoder::TimeFeatureEncoder;
use crate::engine::{select_device, InferenceEngine, MlpEngine};
use crate::error::{ForecastError, ForecastResult};
use crate::feature_spec::FeatureSpec;
use crate::time::{Meridiem, TimeInput};

/// Time-of-week occupancy predictor.
#[derive(Debug)]
pub struct Predictor<E: InferenceEngine = MlpEngine> {
    spec: FeatureSpec,
    encoder: TimeFeatureEncoder,
    engine: E,
}

impl Predictor<MlpEngine> {
    /// Load the model and spec named in `config` from its asset directory.
    pub fn from_config(config: &ForecastConfig) -> ForecastResult<Self> {
        let assets = DirAssets::new(&config.assets.dir);
        Self::load(
            &assets,
            &config.assets.model_file,
            &config.assets.spec_file,
            &config.inference,
        )
    }

    /// Load the model and spec from an asset source.
    ///
    /// # Errors
    /// - `ForecastError::AssetLoad` if either asset is missing or the feature spec is malformed
    /// - `ForecastError::ModelInit` if the model bytes are rejected or its input
    ///   width differs from the feature spec's count
    pub fn load(
        assets: &dyn AssetSource,
        model_asset: &str,
        spec_asset: &str,
        inference: &InferenceConfig,
    ) -> ForecastResult<Self> {
        info!(
            source = %assets.describe(),
            model = model_asset,
            spec = spec_asset,
            "Loading parking forecast model"
        );

        let spec_bytes = assets.read(spec_asset).map_err(log_load_failure)?;
        let spec = FeatureSpec::from_json_bytes(spec_asset, &spec_bytes).map_err(log_load_failure)?;

        let model_bytes = assets.read(model_asset).map_err(log_load_failure)?;
        let device = select_device(inference);
        let engine =
            MlpEngine::from_safetensors_bytes(&model_bytes, &device).map_err(log_load_failure)?;

        info!(
            params = engine.param_count(),
            layers = engine.layer_count(),
            bytes = model_bytes.len(),
            "Model weights loaded"
        );

        Self::with_engine(spec, engine).map_err(log_load_failure)
    }

    /// The underlying candle model.
    pub fn engine(&self) -> &MlpEngine {
        &self.engine
    }
}

impl<E: InferenceEngine> Predictor<E> {
    /// Pair a parsed spec with an already-loaded engine.
    ///
    /// # Errors
    /// - `ForecastError::ModelInit` if the engine's input width differs from
    ///   the feature spec's count
    pub fn with_engine(spec: FeatureSpec, engine: E) -> ForecastResult<Self> {
        if engine.input_len() != spec.input_len() {
            return Err(ForecastError::model_init(format!(
                "model expects {} inputs but feature spec lists {}",
                engine.input_len(),
                spec.input_len()
            )));
        }

        let unmapped = spec.unmapped_features();
        if !unmapped.is_empty() {
            warn!(
                unmapped = ?unmapped,
                "Feature spec lists names the encoder does not compute; they will be fed 0.0"
            );
        }

        let encoder = TimeFeatureEncoder::new(spec.feature_order());
        info!(
            backend = %engine.backend(),
            features = spec.input_len(),
            mae_pp = spec.error_mae_pp(),
            band90_pp = ?spec.error_band90_pp(),
            "Predictor ready"
        );

        Ok(Self {
            spec,
            encoder,
            engine,
        })
    }

    pub fn spec(&self) -> &FeatureSpec {
        &self.spec
    }

    /// Forecast for weekday 0=Mon..5=Sat at a 24-hour time.
    ///
    /// # Errors
    /// - `ForecastError::InvalidInput` before any inference if an argument is out of range
    /// - `ForecastError::Inference` if the engine fails or returns NaN
    pub fn predict(&self, weekday: i32, hour24: i32, minute: i32) -> ForecastResult<Prediction> {
        let input = TimeInput::new(weekday, hour24, minute)?;
        self.predict_input(&input)
    }

    /// Forecast at a 12-hour time. 12 AM is midnight, 12 PM is noon.
    ///
    /// # Errors
    /// - `ForecastError::InvalidInput` if hour12 ∉ 1..=12 or the other fields are out of range
    pub fn predict_12h(
        &self,
        weekday: i32,
        hour12: i32,
        minute: i32,
        is_am: bool,
    ) -> ForecastResult<Prediction> {
        let input = TimeInput::from_12h(weekday, hour12, minute, Meridiem::from_is_am(is_am))?;
        self.predict_input(&input)
    }

    /// Forecast for an already-validated input.
    pub fn predict_input(&self, input: &TimeInput) -> ForecastResult<Prediction> {
        let start = Instant::now();
        let features = self.encoder.encode(input);
        let raw = self.engine.run(&features)?;

        // Infinities clamp like any other out-of-range output; NaN has no place in [0, 1].
        if raw.is_nan() {
            return Err(ForecastError::Inference {
                message: format!("model returned NaN for {}", input),
            });
        }

        let prediction =
            Prediction::from_raw(raw, self.spec.error_mae_pp(), self.spec.error_band90_pp());

        debug!(
            input = %input,
            raw,
            percent = prediction.percent,
            latency_us = start.elapsed().as_micros() as u64,
            "Prediction computed"
        );

        Ok(prediction)
    }

    /// The projected input vector for `input`, paired with feature names.
    pub fn encode(&self, input: &TimeInput) -> Vec<(&str, f32)> {
        self.spec
            .feature_order()
            .iter()
            .map(String::as_str)
            .zip(self.encoder.encode(input))
            .collect()
    }

    /// Tear down the predictor, freeing the model and its device buffers.
    pub fn release(self) {
        info!(backend = %self.engine.backend(), "Releasing predictor");
        drop(self);
    }
}

fn log_load_failure(err: ForecastError) -> ForecastError {
    error!(error = %err, "Predictor construction FAILED");
    err
}
