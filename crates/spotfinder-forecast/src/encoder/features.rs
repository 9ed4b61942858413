//! Named time features computed from a [`TimeInput`].

use std::f32::consts::PI;

use crate::time::{TimeInput, WEEKDAY_COUNT};

use super::{names, FEATURE_COUNT};

/// The nine scalars the model consumes, before projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeFeatures {
    pub hour_sin: f32,
    pub hour_cos: f32,
    pub is_am: f32,
    pub dow: [f32; WEEKDAY_COUNT],
}

impl TimeFeatures {
    pub fn compute(input: &TimeInput) -> Self {
        let (hour_sin, hour_cos) = cyclical_hour(input.fractional_hour());

        let mut dow = [0.0; WEEKDAY_COUNT];
        dow[input.weekday().index()] = 1.0;

        Self {
            hour_sin,
            hour_cos,
            is_am: if input.hour24() < 12 { 1.0 } else { 0.0 },
            dow,
        }
    }

    /// Look up a feature by name.
    pub fn get(&self, name: &str) -> Option<f32> {
        self.named()
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }

    /// All features paired with their names, in canonical order.
    pub fn named(&self) -> [(&'static str, f32); FEATURE_COUNT] {
        [
            (names::HOUR_SIN, self.hour_sin),
            (names::HOUR_COS, self.hour_cos),
            (names::IS_AM, self.is_am),
            (names::DOW[0], self.dow[0]),
            (names::DOW[1], self.dow[1]),
            (names::DOW[2], self.dow[2]),
            (names::DOW[3], self.dow[3]),
            (names::DOW[4], self.dow[4]),
            (names::DOW[5], self.dow[5]),
        ]
    }
}

/// Sin/cos pair for a fractional hour of day, period 24h.
pub fn cyclical_hour(hour: f32) -> (f32, f32) {
    let phase = 2.0 * PI * hour / 24.0;
    (phase.sin(), phase.cos())
}
