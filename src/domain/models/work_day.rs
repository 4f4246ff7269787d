use serde::{Deserialize, Serialize};
use chrono::NaiveTime;
use sqlx::FromRow;
use std::collections::BTreeMap;
use uuid::Uuid;
use crate::domain::models::time_range::TimeRange;
use crate::error::AppError;

/// One stored row of the weekly schedule: a single range, or a closed marker
/// with no times.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct WorkingHourRow {
    pub id: String,
    pub day_of_week: i32,
    pub opens_at: Option<NaiveTime>,
    pub closes_at: Option<NaiveTime>,
    pub is_open: bool,
}

impl WorkingHourRow {
    pub fn open(day_of_week: i32, range: TimeRange) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            day_of_week,
            opens_at: Some(range.start),
            closes_at: Some(range.end),
            is_open: true,
        }
    }

    pub fn closed(day_of_week: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            day_of_week,
            opens_at: None,
            closes_at: None,
            is_open: false,
        }
    }

    /// Rows that replace everything stored for `day_of_week`.
    pub fn rows_for(day_of_week: i32, ranges: &[TimeRange], active: bool) -> Vec<Self> {
        if active && !ranges.is_empty() {
            ranges.iter().map(|r| Self::open(day_of_week, *r)).collect()
        } else {
            vec![Self::closed(day_of_week)]
        }
    }

    /// Only open rows with both bounds set carry a range.
    pub fn range(&self) -> Option<TimeRange> {
        match (self.is_open, self.opens_at, self.closes_at) {
            (true, Some(start), Some(end)) => TimeRange::new(start, end).ok(),
            _ => None,
        }
    }
}

/// Recurring schedule of one ISO weekday (1 = Monday .. 7 = Sunday).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WorkDay {
    pub id: String,
    pub day_of_week: i32,
    pub ranges: Vec<TimeRange>,
    pub active: bool,
}

impl WorkDay {
    /// Folds stored rows into one entry per weekday, ordered by weekday.
    /// A weekday is active if any of its rows is.
    pub fn group(rows: &[WorkingHourRow]) -> Vec<WorkDay> {
        let mut grouped: BTreeMap<i32, WorkDay> = BTreeMap::new();

        for row in rows {
            let entry = grouped.entry(row.day_of_week).or_insert_with(|| WorkDay {
                id: row.id.clone(),
                day_of_week: row.day_of_week,
                ranges: Vec::new(),
                active: false,
            });
            entry.ranges.extend(row.range());
            entry.active |= row.is_open;
        }

        grouped.into_values()
            .map(|mut day| {
                day.ranges.sort_by_key(|r| r.start);
                day
            })
            .collect()
    }
}

pub fn validate_weekday(day_of_week: i32) -> Result<(), AppError> {
    if !(1..=7).contains(&day_of_week) {
        return Err(AppError::Validation(format!(
            "Invalid day_of_week {} (expected 1 = Monday .. 7 = Sunday)",
            day_of_week
        )));
    }
    Ok(())
}
