//! Time-of-week feature encoder.
//!
//! Turns a validated [`TimeInput`] into the exact input vector the bundled
//! model was trained on.
//!
//! # Features
//!
//! | Name | Value |
//! |------|-------|
//! | `hour_sin` | sin(2π·h/24), h = hour24 + minute/60 |
//! | `hour_cos` | cos(2π·h/24) |
//! | `is_am` | 1.0 if hour24 < 12 else 0.0 |
//! | `dow_0`..`dow_5` | one-hot weekday, Mon..Sat |
//!
//! Clock time wraps at 24h, so time of day is encoded as a sin/cos pair:
//! 23:59 and 00:00 land next to each other instead of at opposite ends of a
//! linear scale.
//!
//! # Projection
//!
//! The feature spec's order list is authoritative. Each position is resolved
//! once at construction; names the encoder does not compute are fed 0.0.

mod features;

#[cfg(test)]
mod tests;

pub use features::{cyclical_hour, TimeFeatures};

use crate::time::{TimeInput, WEEKDAY_COUNT};

/// Feature names produced by the encoder.
pub mod names {
    pub const HOUR_SIN: &str = "hour_sin";
    pub const HOUR_COS: &str = "hour_cos";
    pub const IS_AM: &str = "is_am";
    pub const DOW: [&str; 6] = ["dow_0", "dow_1", "dow_2", "dow_3", "dow_4", "dow_5"];
}

/// Number of named scalars the encoder computes.
pub const FEATURE_COUNT: usize = 3 + WEEKDAY_COUNT;

/// Whether the encoder computes a feature with this name.
pub fn is_known_feature(name: &str) -> bool {
    Slot::resolve(name) != Slot::Unmapped
}

/// Where one position of the input vector takes its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    HourSin,
    HourCos,
    IsAm,
    Dow(usize),
    Unmapped,
}

impl Slot {
    fn resolve(name: &str) -> Self {
        match name {
            names::HOUR_SIN => Slot::HourSin,
            names::HOUR_COS => Slot::HourCos,
            names::IS_AM => Slot::IsAm,
            other => names::DOW
                .iter()
                .position(|dow| *dow == other)
                .map(Slot::Dow)
                .unwrap_or(Slot::Unmapped),
        }
    }

    fn value(self, features: &TimeFeatures) -> f32 {
        match self {
            Slot::HourSin => features.hour_sin,
            Slot::HourCos => features.hour_cos,
            Slot::IsAm => features.is_am,
            Slot::Dow(i) => features.dow[i],
            Slot::Unmapped => 0.0,
        }
    }
}

/// Projects time features into a fixed feature order.
#[derive(Debug, Clone)]
pub struct TimeFeatureEncoder {
    slots: Vec<Slot>,
}

impl TimeFeatureEncoder {
    pub fn new<S: AsRef<str>>(feature_order: &[S]) -> Self {
        Self {
            slots: feature_order.iter().map(|n| Slot::resolve(n.as_ref())).collect(),
        }
    }

    /// Length of the vectors produced by [`encode`](Self::encode).
    pub fn input_len(&self) -> usize {
        self.slots.len()
    }

    /// Number of positions that will always be 0.0.
    pub fn unmapped_count(&self) -> usize {
        self.slots.iter().filter(|s| **s == Slot::Unmapped).count()
    }

    /// Encode a validated input into the model's input vector.
    pub fn encode(&self, input: &TimeInput) -> Vec<f32> {
        self.project(&TimeFeatures::compute(input))
    }

    /// Project precomputed features into this encoder's order.
    pub fn project(&self, features: &TimeFeatures) -> Vec<f32> {
        self.slots.iter().map(|slot| slot.value(features)).collect()
    }
}
