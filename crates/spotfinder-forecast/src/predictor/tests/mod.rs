//! Tests for the parking predictor.


use std::cell::Cell;
use std::io;
use std::sync::{Arc, Mutex};

use crate::engine::InferenceEngine;
use crate::error::ForecastResult;
use crate::feature_spec::FeatureSpec;

pub(crate) const MAE_PP: f32 = 6.5;
pub(crate) const BAND90_PP: f32 = 13.25;

pub(crate) fn canonical_spec() -> FeatureSpec {
    FeatureSpec::from_json_bytes(
        "feature_spec_timeonly.json",
        br#"{
            "numeric_feature_order": ["hour_sin", "hour_cos", "is_am", "dow_0", "dow_1", "dow_2", "dow_3", "dow_4", "dow_5"],
            "fixed_error_mae_pp": 6.5,
            "fixed_error_band90_pp": 13.25
        }"#,
    )
    .expect("canonical spec parses")
}

/// Engine that derives its output from the features and counts calls.
pub(crate) struct ScriptedEngine {
    input_len: usize,
    output: fn(&[f32]) -> f32,
    calls: Cell<usize>,
    last: Cell<Option<[f32; 9]>>,
}

impl ScriptedEngine {
    pub(crate) fn new(input_len: usize, output: fn(&[f32]) -> f32) -> Self {
        Self {
            input_len,
            output,
            calls: Cell::new(0),
            last: Cell::new(None),
        }
    }

    /// Deterministic function of every feature, roughly spread over [-0.5, 1.5].
    pub(crate) fn mixing() -> Self {
        Self::new(9, |x| {
            let weekday: f32 = x[3..].iter().enumerate().map(|(i, v)| v * i as f32 * 0.1).sum();
            0.5 + 0.4 * x[0] - 0.3 * x[1] + 0.2 * x[2] + weekday
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.get()
    }

    pub(crate) fn last_features(&self) -> Option<[f32; 9]> {
        self.last.get()
    }
}

impl std::fmt::Debug for ScriptedEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedEngine")
            .field("input_len", &self.input_len)
            .field("calls", &self.calls.get())
            .finish()
    }
}

impl InferenceEngine for ScriptedEngine {
    fn input_len(&self) -> usize {
        self.input_len
    }

    fn run(&self, features: &[f32]) -> ForecastResult<f32> {
        self.calls.set(self.calls.get() + 1);
        if let Ok(snapshot) = <[f32; 9]>::try_from(features) {
            self.last.set(Some(snapshot));
        }
        Ok((self.output)(features))
    }
}

/// Log sink for asserting on emitted events.
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Run `f` with a WARN-level subscriber writing into this sink.
    pub(crate) fn capture<T>(&self, f: impl FnOnce() -> T) -> T {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }

    pub(crate) fn contents(&self) -> String {
        let bytes = self.0.lock().map(|b| b.clone()).unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut bytes) = self.0.lock() {
            bytes.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
