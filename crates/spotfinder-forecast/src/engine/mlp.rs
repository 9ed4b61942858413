//! Dense feed-forward network on candle.
//!
//! # Model Format
//!
//! A single safetensors file with, for consecutive `i` starting at 0:
//! - `layers.{i}.weight`: `[out, in]`
//! - `layers.{i}.bias`: `[out]` (optional)
//!
//! Hidden layers use ReLU; the last layer is linear with one output unit.

use std::collections::HashMap;

use candle_core::{safetensors, DType, Device, Module, Tensor};
use candle_nn::Linear;
use tracing::debug;

use crate::error::{ForecastError, ForecastResult};

use super::InferenceEngine;

/// Candle-backed multi-layer perceptron.
#[derive(Debug)]
pub struct MlpEngine {
    layers: Vec<Linear>,
    widths: Vec<usize>,
    param_count: usize,
    device: Device,
}

impl MlpEngine {
    /// Load from serialized safetensors bytes.
    ///
    /// # Errors
    /// - `ForecastError::ModelInit` if the bytes are not safetensors or the
    ///   tensors do not form a valid network
    pub fn from_safetensors_bytes(bytes: &[u8], device: &Device) -> ForecastResult<Self> {
        let tensors = safetensors::load_buffer(bytes, device).map_err(|e| {
            ForecastError::model_init(format!("safetensors decode failed: {}", e))
        })?;
        Self::from_tensors(tensors, device)
    }

    /// Build from named tensors.
    ///
    /// # Errors
    /// - `ForecastError::ModelInit` if no `layers.0.weight` exists, a weight is
    ///   not rank 2, consecutive widths disagree, a bias length is wrong, or
    ///   the final layer does not produce exactly one output
    pub fn from_tensors(
        mut tensors: HashMap<String, Tensor>,
        device: &Device,
    ) -> ForecastResult<Self> {
        let mut layers = Vec::new();
        let mut widths = Vec::new();
        let mut param_count = 0usize;

        for index in 0.. {
            let Some(weight) = tensors.remove(&format!("layers.{}.weight", index)) else {
                break;
            };
            let weight = prepare(weight, device, index, "weight")?;
            let (out_dim, in_dim) = weight.dims2().map_err(|_| {
                ForecastError::model_init(format!(
                    "layers.{}.weight must be rank 2 [out, in], got shape {:?}",
                    index,
                    weight.dims()
                ))
            })?;

            if let Some(&previous_out) = widths.last() {
                if previous_out != in_dim {
                    return Err(ForecastError::model_init(format!(
                        "layers.{} expects {} inputs but layers.{} produces {}",
                        index,
                        in_dim,
                        index - 1,
                        previous_out
                    )));
                }
            } else {
                widths.push(in_dim);
            }

            let bias = match tensors.remove(&format!("layers.{}.bias", index)) {
                Some(bias) => {
                    let bias = prepare(bias, device, index, "bias")?;
                    if bias.dims() != [out_dim] {
                        return Err(ForecastError::model_init(format!(
                            "layers.{}.bias must have shape [{}], got {:?}",
                            index,
                            out_dim,
                            bias.dims()
                        )));
                    }
                    param_count += out_dim;
                    Some(bias)
                }
                None => None,
            };

            param_count += out_dim * in_dim;
            widths.push(out_dim);
            layers.push(Linear::new(weight, bias));
        }

        if layers.is_empty() {
            return Err(ForecastError::model_init(
                "model has no layers (expected layers.0.weight)",
            ));
        }
        if !tensors.is_empty() {
            let mut extra: Vec<_> = tensors.keys().cloned().collect();
            extra.sort();
            debug!(extra = ?extra, "Ignoring tensors outside the layer chain");
        }
        if widths.last() != Some(&1) {
            return Err(ForecastError::model_init(format!(
                "model must produce a single output, final layer width is {}",
                widths.last().copied().unwrap_or_default()
            )));
        }

        Ok(Self {
            layers,
            widths,
            param_count,
            device: device.clone(),
        })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Layer widths from input to output, e.g. `[9, 32, 16, 1]`.
    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    pub fn param_count(&self) -> usize {
        self.param_count
    }

    fn forward(&self, features: &[f32]) -> candle_core::Result<Vec<f32>> {
        let mut hidden = Tensor::from_slice(features, (1, features.len()), &self.device)?;
        let last = self.layers.len() - 1;
        for (index, layer) in self.layers.iter().enumerate() {
            hidden = layer.forward(&hidden)?;
            if index < last {
                hidden = hidden.relu()?;
            }
        }
        hidden.flatten_all()?.to_vec1::<f32>()
    }
}

fn prepare(tensor: Tensor, device: &Device, index: usize, kind: &str) -> ForecastResult<Tensor> {
    tensor
        .to_dtype(DType::F32)
        .and_then(|t| t.to_device(device))
        .map_err(|e| ForecastError::model_init(format!("layers.{}.{} unusable: {}", index, kind, e)))
}

impl InferenceEngine for MlpEngine {
    fn input_len(&self) -> usize {
        self.widths[0]
    }

    fn run(&self, features: &[f32]) -> ForecastResult<f32> {
        if features.len() != self.input_len() {
            return Err(ForecastError::Inference {
                message: format!(
                    "expected {} features, got {}",
                    self.input_len(),
                    features.len()
                ),
            });
        }

        let output = self.forward(features).map_err(|e| ForecastError::Inference {
            message: format!("forward pass failed: {}", e),
        })?;

        output.first().copied().ok_or_else(|| ForecastError::Inference {
            message: "model produced an empty output".to_string(),
        })
    }

    fn backend(&self) -> String {
        let device = if self.device.is_cuda() { "cuda" } else { "cpu" };
        format!("candle-mlp {:?} on {}", self.widths, device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tensor(values: &[f32], shape: &[usize]) -> Tensor {
        Tensor::from_slice(values, shape, &Device::Cpu).expect("tensor")
    }

    /// 3 -> 2 -> 1 network with hand-checkable weights.
    fn two_layer() -> HashMap<String, Tensor> {
        HashMap::from([
            (
                "layers.0.weight".to_string(),
                tensor(&[1.0, 0.0, 0.0, 0.0, -1.0, 0.0], &[2, 3]),
            ),
            ("layers.0.bias".to_string(), tensor(&[0.0, 0.5], &[2])),
            ("layers.1.weight".to_string(), tensor(&[0.25, 1.0], &[1, 2])),
            ("layers.1.bias".to_string(), tensor(&[0.1], &[1])),
        ])
    }

    #[test]
    fn test_forward_applies_relu_between_layers() {
        let engine = MlpEngine::from_tensors(two_layer(), &Device::Cpu).expect("valid model");
        assert_eq!(engine.input_len(), 3);
        assert_eq!(engine.layer_count(), 2);
        assert_eq!(engine.widths(), &[3, 2, 1]);
        assert_eq!(engine.param_count(), 6 + 2 + 2 + 1);

        // hidden = relu([2, -1 + 0.5]) = [2, 0]; out = 0.25*2 + 0 + 0.1
        let out = engine.run(&[2.0, 1.0, 7.0]).expect("run");
        assert!((out - 0.6).abs() < 1e-6, "got {}", out);

        // hidden = relu([0, 0.5]) = [0, 0.5]; out = 0.5 + 0.1
        let out = engine.run(&[0.0, 0.0, 0.0]).expect("run");
        assert!((out - 0.6).abs() < 1e-6, "got {}", out);
    }

    #[test]
    fn test_bias_is_optional() {
        let tensors = HashMap::from([(
            "layers.0.weight".to_string(),
            tensor(&[0.5, 0.5], &[1, 2]),
        )]);
        let engine = MlpEngine::from_tensors(tensors, &Device::Cpu).expect("valid model");
        let out = engine.run(&[1.0, 3.0]).expect("run");
        assert!((out - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_wrong_feature_length_is_inference_error() {
        let engine = MlpEngine::from_tensors(two_layer(), &Device::Cpu).expect("valid model");
        let err = engine.run(&[1.0]).unwrap_err();
        assert!(matches!(err, ForecastError::Inference { .. }));
    }

    #[test]
    fn test_rejects_empty_model() {
        let err = MlpEngine::from_tensors(HashMap::new(), &Device::Cpu).unwrap_err();
        assert!(matches!(err, ForecastError::ModelInit { .. }));
    }

    #[test]
    fn test_rejects_width_mismatch() {
        let mut tensors = two_layer();
        tensors.insert("layers.1.weight".to_string(), tensor(&[1.0, 1.0, 1.0], &[1, 3]));
        let err = MlpEngine::from_tensors(tensors, &Device::Cpu).unwrap_err();
        assert!(err.to_string().contains("layers.1"), "{}", err);
    }

    #[test]
    fn test_rejects_bad_bias_and_multi_output() {
        let mut tensors = two_layer();
        tensors.insert("layers.0.bias".to_string(), tensor(&[0.0, 0.0, 0.0], &[3]));
        assert!(MlpEngine::from_tensors(tensors, &Device::Cpu).is_err());

        let tensors = HashMap::from([(
            "layers.0.weight".to_string(),
            tensor(&[1.0, 0.0, 0.0, 1.0], &[2, 2]),
        )]);
        let err = MlpEngine::from_tensors(tensors, &Device::Cpu).unwrap_err();
        assert!(err.to_string().contains("single output"), "{}", err);
    }

    #[test]
    fn test_rejects_rank_one_weight() {
        let tensors = HashMap::from([("layers.0.weight".to_string(), tensor(&[1.0, 2.0], &[2]))]);
        let err = MlpEngine::from_tensors(tensors, &Device::Cpu).unwrap_err();
        assert!(err.to_string().contains("rank 2"), "{}", err);
    }

    #[test]
    fn test_rejects_non_safetensors_bytes() {
        let err = MlpEngine::from_safetensors_bytes(b"TFL3 not a safetensors file", &Device::Cpu)
            .unwrap_err();
        assert!(matches!(err, ForecastError::ModelInit { .. }));
    }

    #[test]
    fn test_casts_to_f32() {
        let weight = tensor(&[2.0, 0.0], &[1, 2])
            .to_dtype(DType::F64)
            .expect("f64");
        let tensors = HashMap::from([("layers.0.weight".to_string(), weight)]);
        let engine = MlpEngine::from_tensors(tensors, &Device::Cpu).expect("valid model");
        let out = engine.run(&[0.25, 9.0]).expect("run");
        assert!((out - 0.5).abs() < 1e-6);
    }
}
