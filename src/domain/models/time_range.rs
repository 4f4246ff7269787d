use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use crate::domain::services::clinic_time::minutes_of_day;
use crate::error::AppError;

/// Opening window within a single day. Only hour/minute/second matter.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, AppError> {
        let range = Self { start, end };
        if !range.is_valid() {
            return Err(AppError::Validation(
                "Invalid time range: opening time must be before closing time".into(),
            ));
        }
        Ok(range)
    }

    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    pub fn start_minutes(&self) -> u32 {
        minutes_of_day(self.start)
    }

    pub fn end_minutes(&self) -> u32 {
        minutes_of_day(self.end)
    }

    /// Half-open containment: an interval ending exactly at closing time fits.
    pub fn contains_minutes(&self, start_min: u32, end_min: u32) -> bool {
        self.start_minutes() <= start_min && end_min <= self.end_minutes()
    }
}

/// Accepts `HH:MM` and `HH:MM:SS`.
pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| AppError::Validation(format!("Invalid time '{}' (expected HH:MM)", raw)))
}
