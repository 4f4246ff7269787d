use std::collections::BTreeMap;
use std::sync::Arc;
use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use tracing::{debug, info};
use crate::domain::{
    models::{
        effective_day::EffectiveDay,
        special_day::{SpecialDay, SpecialHourRow},
        time_range::TimeRange,
        work_day::{validate_weekday, WorkDay},
    },
    ports::ScheduleRepository,
};
use crate::domain::services::clinic_time::{minutes_of_day, utc_to_local};
use crate::error::AppError;

/// Longest period a single range query may cover.
pub const MAX_RANGE_DAYS: i64 = 366;

pub struct ScheduleService {
    repo: Arc<dyn ScheduleRepository>,
    tz: Tz,
}

impl ScheduleService {
    pub fn new(repo: Arc<dyn ScheduleRepository>, tz: Tz) -> Self {
        Self { repo, tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub async fn working_hours(&self) -> Result<Vec<WorkDay>, AppError> {
        let rows = self.repo.list_working_hours().await?;
        Ok(WorkDay::group(&rows))
    }

    pub async fn special_hours_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<SpecialDay>, AppError> {
        validate_period(start, end)?;
        let rows = self.repo.list_special_hours_between(start, end).await?;
        Ok(SpecialDay::group(&rows))
    }

    /// Overrides win outright; the weekly schedule is only read when the date
    /// has no override rows at all.
    pub async fn effective_day(&self, date: NaiveDate) -> Result<EffectiveDay, AppError> {
        let specials = self.repo.find_special_hours_by_date(date).await?;
        if let Some(day) = EffectiveDay::from_overrides(date, &specials) {
            debug!(%date, active = day.active, "Resolved effective day from override");
            return Ok(day);
        }

        let weekly = self.repo.list_working_hours().await?;
        Ok(EffectiveDay::from_weekly(date, &weekly))
    }

    /// One entry per date in `[start, end]`, ascending. Reads the overrides of the
    /// whole period and the weekly schedule once, then applies the same rule as
    /// `effective_day` to each date.
    pub async fn effective_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<EffectiveDay>, AppError> {
        validate_period(start, end)?;

        let mut overrides: BTreeMap<NaiveDate, Vec<SpecialHourRow>> = BTreeMap::new();
        for row in self.repo.list_special_hours_between(start, end).await? {
            overrides.entry(row.date).or_default().push(row);
        }

        let weekly = self.repo.list_working_hours().await?;

        Ok(start.iter_days()
            .take_while(|d| *d <= end)
            .map(|date| {
                let rows = overrides.get(&date).map(Vec::as_slice).unwrap_or_default();
                EffectiveDay::from_overrides(date, rows)
                    .unwrap_or_else(|| EffectiveDay::from_weekly(date, &weekly))
            })
            .collect())
    }

    pub async fn is_date_open(&self, date: NaiveDate) -> Result<bool, AppError> {
        Ok(self.effective_day(date).await?.active)
    }

    /// Validates a clinic-local `[start, end)` on `date`. Fails with a conflict
    /// when the day is closed or no single open range holds the interval.
    pub async fn is_within_business_hours(&self, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Result<bool, AppError> {
        if end <= start {
            return Err(AppError::Validation("End time must be after start time".into()));
        }

        let day = self.effective_day(date).await?;
        day.check_within(minutes_of_day(start), minutes_of_day(end))?;
        Ok(true)
    }

    /// Same rule for an appointment given as instants. The clinic-local date of
    /// `start` is the day checked; an interval running past midnight never fits.
    pub async fn check_appointment_hours(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), AppError> {
        let (start_date, start_time) = utc_to_local(self.tz, start);
        let (end_date, end_time) = utc_to_local(self.tz, end);

        let days_spanned = (end_date - start_date).num_days().max(0) as u32;
        // Partial minutes at the end round up so a booking never ends past closing.
        let end_min = minutes_of_day(end_time)
            + u32::from(end_time.second() > 0)
            + days_spanned * 24 * 60;

        let day = self.effective_day(start_date).await?;
        day.check_within(minutes_of_day(start_time), end_min)
    }

    pub async fn replace_work_day(&self, day_of_week: i32, ranges: Vec<TimeRange>, active: bool) -> Result<WorkDay, AppError> {
        validate_weekday(day_of_week)?;
        validate_ranges(&ranges)?;

        let rows = self.repo.replace_working_hour(day_of_week, &ranges, active).await?;
        info!(day_of_week, ranges = ranges.len(), active, "Replaced working hours");

        WorkDay::group(&rows).into_iter().next()
            .ok_or_else(|| AppError::InternalWithMsg(format!("No rows stored for weekday {}", day_of_week)))
    }

    pub async fn replace_special_day(&self, date: NaiveDate, ranges: Vec<TimeRange>, active: bool) -> Result<SpecialDay, AppError> {
        validate_ranges(&ranges)?;

        let rows = self.repo.replace_special_hour(date, &ranges, active).await?;
        info!(%date, ranges = ranges.len(), active, "Replaced special hours");

        SpecialDay::group(&rows).into_iter().next()
            .ok_or_else(|| AppError::InternalWithMsg(format!("No rows stored for {}", date)))
    }

    pub async fn delete_special_day(&self, date: NaiveDate) -> Result<(), AppError> {
        self.repo.delete_special_hour(date).await?;
        info!(%date, "Deleted special hours");
        Ok(())
    }
}

fn validate_ranges(ranges: &[TimeRange]) -> Result<(), AppError> {
    if ranges.iter().any(|r| !r.is_valid()) {
        return Err(AppError::Validation(
            "Invalid time range: opening time must be before closing time".into(),
        ));
    }
    Ok(())
}

fn validate_period(start: NaiveDate, end: NaiveDate) -> Result<(), AppError> {
    if start > end {
        return Err(AppError::Validation("Start date must not be after end date".into()));
    }
    if (end - start).num_days() >= MAX_RANGE_DAYS {
        return Err(AppError::Validation(format!("Date range may cover at most {} days", MAX_RANGE_DAYS)));
    }
    Ok(())
}
