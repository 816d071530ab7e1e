//! The calendar month a forecast is produced for

use crate::error::{ForecastError, Result};
use chrono::Month;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Human readable form accepted by [`TargetMonth::parse`]
pub const TARGET_MONTH_FORMAT: &str = "March 2026";

/// A validated (year, month) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetMonth {
    year: i32,
    month: u32,
}

impl TargetMonth {
    /// Create a target month; `month` must be in 1..=12
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ForecastError::InvalidParameter(format!(
                "Target month must be between 1 and 12, got {}",
                month
            )));
        }
        if year <= 0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Target year must be positive, got {}",
                year
            )));
        }

        Ok(Self { year, month })
    }

    /// Parse a month name followed by a year, e.g. `"March 2026"` or `"mar 2026"`
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || ForecastError::InvalidTargetMonth {
            input: input.to_string(),
            expected: TARGET_MONTH_FORMAT,
        };

        let mut parts = input.split_whitespace();
        let (Some(name), Some(year), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };

        let month = name.parse::<Month>().map_err(|_| invalid())?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;

        Self::new(year, month.number_from_month()).map_err(|_| invalid())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl FromStr for TargetMonth {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for TargetMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("Unknown");
        write!(f, "{} {}", name, self.year)
    }
}
