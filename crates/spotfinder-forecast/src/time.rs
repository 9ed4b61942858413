//! Validated time-of-week input.
//!
//! The model was trained on Monday..Saturday only; Sunday has no
//! representation and is rejected like any other out-of-range value.

use std::fmt;

use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, ForecastResult};

/// Number of weekdays in the model domain (Mon..Sat).
pub const WEEKDAY_COUNT: usize = 6;

/// Weekday within the model domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday = 0,
    Tuesday = 1,
    Wednesday = 2,
    Thursday = 3,
    Friday = 4,
    Saturday = 5,
}

impl Weekday {
    /// Returns all weekdays in index order.
    pub fn all() -> &'static [Weekday; WEEKDAY_COUNT] {
        &[
            Weekday::Monday,
            Weekday::Tuesday,
            Weekday::Wednesday,
            Weekday::Thursday,
            Weekday::Friday,
            Weekday::Saturday,
        ]
    }

    /// Map 0=Mon..5=Sat.
    ///
    /// # Errors
    /// - `ForecastError::InvalidInput` for anything outside 0..=5
    pub fn from_index(index: i32) -> ForecastResult<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::all().get(i).copied())
            .ok_or_else(|| {
                ForecastError::invalid(
                    "weekday",
                    format!("weekday must be 0..5 (Mon..Sat), got {}", index),
                )
            })
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Three-letter label as shown on the forecast screen.
    pub fn short_name(self) -> &'static str {
        match self {
            Weekday::Monday => "Mon",
            Weekday::Tuesday => "Tue",
            Weekday::Wednesday => "Wed",
            Weekday::Thursday => "Thu",
            Weekday::Friday => "Fri",
            Weekday::Saturday => "Sat",
        }
    }

    /// Parse a day name ("mon", "Monday") or index ("0".."5").
    pub fn parse(s: &str) -> ForecastResult<Self> {
        let normalized = s.trim().to_lowercase();
        if let Ok(index) = normalized.parse::<i32>() {
            return Self::from_index(index);
        }
        Self::all()
            .iter()
            .copied()
            .find(|day| {
                let short = day.short_name().to_lowercase();
                normalized == short || normalized == day.to_string().to_lowercase()
            })
            .ok_or_else(|| {
                ForecastError::invalid(
                    "weekday",
                    format!("unknown weekday '{}' (expected Mon..Sat)", s.trim()),
                )
            })
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        };
        f.write_str(name)
    }
}

impl TryFrom<chrono::Weekday> for Weekday {
    type Error = ForecastError;

    fn try_from(day: chrono::Weekday) -> ForecastResult<Self> {
        match day {
            chrono::Weekday::Sun => Err(ForecastError::invalid(
                "weekday",
                "Sunday is outside the forecast domain (Mon..Sat)",
            )),
            other => Self::from_index(other.num_days_from_monday() as i32),
        }
    }
}

/// AM/PM half of a 12-hour clock reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    pub fn from_is_am(is_am: bool) -> Self {
        if is_am {
            Meridiem::Am
        } else {
            Meridiem::Pm
        }
    }
}

/// A validated (weekday, hour, minute) reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeInput {
    weekday: Weekday,
    hour24: u8,
    minute: u8,
}

impl TimeInput {
    /// Validate a 24-hour reading.
    ///
    /// # Errors
    /// - `ForecastError::InvalidInput` if weekday ∉ 0..=5, hour24 ∉ 0..=23 or minute ∉ 0..=59
    pub fn new(weekday: i32, hour24: i32, minute: i32) -> ForecastResult<Self> {
        let weekday = Weekday::from_index(weekday)?;
        if !(0..=23).contains(&hour24) {
            return Err(ForecastError::invalid(
                "hour24",
                format!("hour must be 0..23, got {}", hour24),
            ));
        }
        if !(0..=59).contains(&minute) {
            return Err(ForecastError::invalid(
                "minute",
                format!("minute must be 0..59, got {}", minute),
            ));
        }
        Ok(Self {
            weekday,
            hour24: hour24 as u8,
            minute: minute as u8,
        })
    }

    /// Validate a 12-hour reading and convert it.
    ///
    /// 12 AM maps to hour 0 and 12 PM to hour 12; other PM hours add 12.
    pub fn from_12h(weekday: i32, hour12: i32, minute: i32, meridiem: Meridiem) -> ForecastResult<Self> {
        Self::new(weekday, to_hour24(hour12, meridiem)?, minute)
    }

    /// Reading for a local date-time. Seconds are dropped.
    pub fn from_datetime<T: Datelike + Timelike>(at: &T) -> ForecastResult<Self> {
        let weekday = Weekday::try_from(at.weekday())?;
        Self::new(weekday.index() as i32, at.hour() as i32, at.minute() as i32)
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn hour24(&self) -> u8 {
        self.hour24
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Fractional hour of day in [0, 24).
    pub fn fractional_hour(&self) -> f32 {
        self.hour24 as f32 + self.minute as f32 / 60.0
    }
}

impl fmt::Display for TimeInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:02}:{:02}",
            self.weekday.short_name(),
            self.hour24,
            self.minute
        )
    }
}

/// Standard 12 → 24 hour conversion.
///
/// # Errors
/// - `ForecastError::InvalidInput` if hour12 ∉ 1..=12
pub fn to_hour24(hour12: i32, meridiem: Meridiem) -> ForecastResult<i32> {
    if !(1..=12).contains(&hour12) {
        return Err(ForecastError::invalid(
            "hour12",
            format!("hour12 must be 1..12, got {}", hour12),
        ));
    }
    Ok(match (meridiem, hour12) {
        (Meridiem::Am, 12) => 0,
        (Meridiem::Am, h) => h,
        (Meridiem::Pm, 12) => 12,
        (Meridiem::Pm, h) => h + 12,
    })
}
