//! Feature specification shipped alongside the model.
//!
//! The JSON document fixes the positional layout of the model input and
//! carries the model's global accuracy figures:
//!
//! ```json
//! {
//!   "numeric_feature_order": ["hour_sin", "hour_cos", "is_am", "dow_0", "dow_1", "dow_2", "dow_3", "dow_4", "dow_5"],
//!   "fixed_error_mae_pp": 6.42,
//!   "fixed_error_band90_pp": 13.1
//! }
//! ```

use serde::Deserialize;
use serde_json::Value;

use crate::encoder::is_known_feature;
use crate::error::{ForecastError, ForecastResult};

/// On-disk shape. Error constants stay loose so non-numeric values degrade to absent.
#[derive(Debug, Deserialize)]
struct RawFeatureSpec {
    numeric_feature_order: Vec<String>,
    #[serde(default)]
    fixed_error_mae_pp: Option<Value>,
    #[serde(default)]
    fixed_error_band90_pp: Option<Value>,
}

/// Immutable feature layout and model error constants.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSpec {
    feature_order: Vec<String>,
    error_mae_pp: f32,
    error_band90_pp: Option<f32>,
}

impl FeatureSpec {
    /// Parse a feature spec document.
    ///
    /// `asset` names the source in error messages.
    ///
    /// # Errors
    /// - `ForecastError::AssetLoad` if the bytes are not a JSON object with a
    ///   non-empty `numeric_feature_order` array of strings
    pub fn from_json_bytes(asset: &str, bytes: &[u8]) -> ForecastResult<Self> {
        let raw: RawFeatureSpec = serde_json::from_slice(bytes)
            .map_err(|e| ForecastError::asset(asset, format!("malformed feature spec: {}", e)))?;

        if raw.numeric_feature_order.is_empty() {
            return Err(ForecastError::asset(
                asset,
                "numeric_feature_order must list at least one feature",
            ));
        }

        Ok(Self {
            feature_order: raw.numeric_feature_order,
            // MAE is reported even when the document omits it, as NaN.
            error_mae_pp: numeric(raw.fixed_error_mae_pp.as_ref()).unwrap_or(f32::NAN),
            error_band90_pp: numeric(raw.fixed_error_band90_pp.as_ref()),
        })
    }

    /// Build a spec directly, e.g. for an embedded model.
    pub fn new(
        feature_order: Vec<String>,
        error_mae_pp: f32,
        error_band90_pp: Option<f32>,
    ) -> ForecastResult<Self> {
        if feature_order.is_empty() {
            return Err(ForecastError::asset(
                "<inline>",
                "numeric_feature_order must list at least one feature",
            ));
        }
        Ok(Self {
            feature_order,
            error_mae_pp,
            error_band90_pp,
        })
    }

    /// Ordered feature names defining the input vector layout.
    pub fn feature_order(&self) -> &[String] {
        &self.feature_order
    }

    /// Length of the input vector the model expects.
    pub fn input_len(&self) -> usize {
        self.feature_order.len()
    }

    /// Mean absolute error in percentage points. NaN when the document omitted it.
    pub fn error_mae_pp(&self) -> f32 {
        self.error_mae_pp
    }

    pub fn error_band90_pp(&self) -> Option<f32> {
        self.error_band90_pp
    }

    /// Names in the order list that the encoder does not compute.
    ///
    /// These positions are always fed 0.0.
    pub fn unmapped_features(&self) -> Vec<&str> {
        self.feature_order
            .iter()
            .map(String::as_str)
            .filter(|name| !is_known_feature(name))
            .collect()
    }
}

fn numeric(value: Option<&Value>) -> Option<f32> {
    value.and_then(Value::as_f64).map(|v| v as f32)
}
