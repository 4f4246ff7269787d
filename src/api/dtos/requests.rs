use crate::domain::models::time_range::{parse_time_of_day, TimeRange};
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Times arrive as `HH:MM` or `HH:MM:SS` strings.
#[derive(Deserialize)]
pub struct TimeRangeRequest {
    pub start: String,
    pub end: String,
}

impl TimeRangeRequest {
    pub fn parse(&self) -> Result<TimeRange, AppError> {
        TimeRange::new(parse_time_of_day(&self.start)?, parse_time_of_day(&self.end)?)
    }
}

pub fn parse_ranges(ranges: &[TimeRangeRequest]) -> Result<Vec<TimeRange>, AppError> {
    ranges.iter().map(TimeRangeRequest::parse).collect()
}

#[derive(Deserialize)]
pub struct WorkDayRequest {
    #[serde(default)]
    pub ranges: Vec<TimeRangeRequest>,
    pub active: Option<bool>,
}

#[derive(Deserialize)]
pub struct SpecialDayRequest {
    /// Required on POST; on PUT the path date wins.
    pub date: Option<String>,
    #[serde(default)]
    pub ranges: Vec<TimeRangeRequest>,
    pub active: Option<bool>,
}

#[derive(Deserialize)]
pub struct ValidateRangeRequest {
    pub date: String,
    pub start: String,
    pub end: String,
}

#[derive(Deserialize)]
pub struct CreateAppointmentRequest {
    pub patient_id: Option<String>,
    pub name: Option<String>,
    pub start: DateTime<Utc>,
    pub duration_secs: i64,
}

#[derive(Deserialize)]
pub struct UpdateAppointmentRequest {
    pub start: Option<DateTime<Utc>>,
    pub duration_secs: Option<i64>,
}
