use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use crate::domain::models::{special_day::SpecialHourRow, time_range::TimeRange, work_day::WorkingHourRow};
use crate::domain::services::clinic_time::iso_weekday;
use crate::error::AppError;

/// Opening hours that actually apply on one date. Derived, never stored.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct EffectiveDay {
    pub date: NaiveDate,
    pub ranges: Vec<TimeRange>,
    pub is_override: bool,
    pub active: bool,
}

impl EffectiveDay {
    /// Resolution from the date's override rows. `None` when there are none,
    /// which is the only case where the weekly schedule applies.
    pub fn from_overrides(date: NaiveDate, rows: &[SpecialHourRow]) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }

        let mut ranges: Vec<TimeRange> = rows.iter()
            .filter(|r| r.is_open)
            .filter_map(SpecialHourRow::range)
            .collect();
        ranges.sort_by_key(|r| r.start);

        Some(Self {
            date,
            ranges,
            is_override: true,
            active: rows.iter().any(|r| r.is_open),
        })
    }

    pub fn from_weekly(date: NaiveDate, rows: &[WorkingHourRow]) -> Self {
        let weekday = iso_weekday(date);
        let todays: Vec<&WorkingHourRow> = rows.iter()
            .filter(|r| r.day_of_week == weekday && r.is_open)
            .collect();

        let mut ranges: Vec<TimeRange> = todays.iter().filter_map(|r| r.range()).collect();
        ranges.sort_by_key(|r| r.start);

        Self {
            date,
            ranges,
            is_override: false,
            active: !todays.is_empty(),
        }
    }

    /// Business-hours rule: the day must be open and one single range must
    /// hold `[start_min, end_min)`.
    pub fn check_within(&self, start_min: u32, end_min: u32) -> Result<(), AppError> {
        if !self.active {
            return Err(AppError::Conflict("The clinic is closed on this day".into()));
        }

        if self.ranges.iter().any(|r| r.contains_minutes(start_min, end_min)) {
            Ok(())
        } else {
            Err(AppError::Conflict("The requested time is outside business hours".into()))
        }
    }
}
