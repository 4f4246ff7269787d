use serde::{Deserialize, Serialize};
use chrono::{NaiveDate, NaiveTime};
use sqlx::FromRow;
use std::collections::BTreeMap;
use uuid::Uuid;
use crate::domain::models::time_range::TimeRange;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct SpecialHourRow {
    pub id: String,
    pub date: NaiveDate,
    pub opens_at: Option<NaiveTime>,
    pub closes_at: Option<NaiveTime>,
    pub is_open: bool,
}

impl SpecialHourRow {
    pub fn open(date: NaiveDate, range: TimeRange) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            opens_at: Some(range.start),
            closes_at: Some(range.end),
            is_open: true,
        }
    }

    pub fn closed(date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            opens_at: None,
            closes_at: None,
            is_open: false,
        }
    }

    pub fn rows_for(date: NaiveDate, ranges: &[TimeRange], active: bool) -> Vec<Self> {
        if active && !ranges.is_empty() {
            ranges.iter().map(|r| Self::open(date, *r)).collect()
        } else {
            vec![Self::closed(date)]
        }
    }

    pub fn range(&self) -> Option<TimeRange> {
        match (self.is_open, self.opens_at, self.closes_at) {
            (true, Some(start), Some(end)) => TimeRange::new(start, end).ok(),
            _ => None,
        }
    }
}

/// Date-specific override. When present it replaces the weekly schedule for
/// that date entirely.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpecialDay {
    pub id: String,
    pub date: NaiveDate,
    pub ranges: Vec<TimeRange>,
    pub active: bool,
}

impl SpecialDay {
    pub fn group(rows: &[SpecialHourRow]) -> Vec<SpecialDay> {
        let mut grouped: BTreeMap<NaiveDate, SpecialDay> = BTreeMap::new();

        for row in rows {
            let entry = grouped.entry(row.date).or_insert_with(|| SpecialDay {
                id: row.id.clone(),
                date: row.date,
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
