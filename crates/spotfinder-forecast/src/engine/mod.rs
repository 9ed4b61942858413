//! Inference engine seam.
//!
//! The predictor only needs "run(vector) -> scalar" against the bundled
//! model. [`MlpEngine`] is the candle-backed implementation; tests plug in
//! their own engines through [`InferenceEngine`].

mod mlp;

pub use mlp::MlpEngine;

use candle_core::Device;
use tracing::{info, warn};

use crate::config::InferenceConfig;
use crate::error::ForecastResult;

/// A loaded model mapping a fixed-length feature vector to one scalar.
pub trait InferenceEngine {
    /// Input vector length the model accepts.
    fn input_len(&self) -> usize;

    /// Run a single forward pass.
    ///
    /// # Errors
    /// - `ForecastError::Inference` if the backend fails or `features` has the wrong length
    fn run(&self, features: &[f32]) -> ForecastResult<f32>;

    /// Short backend description for log events.
    fn backend(&self) -> String {
        "custom".to_string()
    }
}

/// Pick the inference device.
///
/// The accelerator is a performance hint: any failure falls back to CPU.
pub fn select_device(config: &InferenceConfig) -> Device {
    if !config.use_accelerator {
        return Device::Cpu;
    }

    match Device::cuda_if_available(config.device_ordinal) {
        Ok(device) if device.is_cuda() => {
            info!(
                ordinal = config.device_ordinal,
                "CUDA device detected, using GPU acceleration"
            );
            device
        }
        Ok(_) => {
            info!("No accelerator available, using CPU");
            Device::Cpu
        }
        Err(e) => {
            warn!(error = %e, "Failed to initialize CUDA, using CPU");
            Device::Cpu
        }
    }
}
