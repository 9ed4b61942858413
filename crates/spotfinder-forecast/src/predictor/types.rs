//! Prediction value object.

use std::fmt;

use serde::Serialize;

use crate::time::TimeInput;

/// One forecast.
///
/// The error figures are global properties of the trained model, copied
/// verbatim from the feature spec; they are identical for every input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    /// Occupancy in [0, 100].
    pub percent: f32,
    /// Mean absolute error in percentage points. NaN when the feature spec omits it.
    pub error_mae_pp: f32,
    /// 90% error band in percentage points.
    pub error_band90_pp: Option<f32>,
}

impl Prediction {
    /// Clamp a raw model output into a percentage.
    pub(crate) fn from_raw(raw: f32, error_mae_pp: f32, error_band90_pp: Option<f32>) -> Self {
        Self {
            percent: raw.clamp(0.0, 1.0) * 100.0,
            error_mae_pp,
            error_band90_pp,
        }
    }
}

impl fmt::Display for Prediction {
    /// Formats as the forecast screen does: `Predicted: 42.0%  |  Error: 6.50 pp`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicted: {:.1}%  |  Error: ", self.percent)?;
        if self.error_mae_pp.is_nan() {
            f.write_str("n/a")?;
        } else {
            write!(f, "{:.2} pp", self.error_mae_pp)?;
        }
        if let Some(band) = self.error_band90_pp {
            write!(f, "  |  90% band: ±{:.2} pp", band)?;
        }
        Ok(())
    }
}

/// A prediction paired with the input that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Forecast {
    pub input: TimeInput,
    #[serde(flatten)]
    pub prediction: Prediction,
}
