use crate::domain::models::{
    appointment::Appointment, special_day::SpecialHourRow, time_range::TimeRange,
    work_day::WorkingHourRow,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Weekly schedule and date overrides, stored one row per range.
/// Reads return raw rows; grouping happens in the domain.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn list_working_hours(&self) -> Result<Vec<WorkingHourRow>, AppError>;
    async fn find_special_hours_by_date(&self, date: NaiveDate) -> Result<Vec<SpecialHourRow>, AppError>;
    async fn list_special_hours_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<SpecialHourRow>, AppError>;

    /// Deletes and re-inserts every row of the weekday in one transaction.
    async fn replace_working_hour(&self, day_of_week: i32, ranges: &[TimeRange], active: bool) -> Result<Vec<WorkingHourRow>, AppError>;
    /// Deletes and re-inserts every row of the date in one transaction.
    async fn replace_special_hour(&self, date: NaiveDate, ranges: &[TimeRange], active: bool) -> Result<Vec<SpecialHourRow>, AppError>;
    async fn delete_special_hour(&self, date: NaiveDate) -> Result<(), AppError>;
}

/// Clinic-local calendar day an appointment is checked against.
#[derive(Debug, Clone, Copy)]
pub struct DayScope {
    pub day: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError>;
    /// Appointments whose occupied interval intersects `[start, end)`.
    async fn list_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Appointment>, AppError>;

    /// Locks the day, re-reads its appointments, rejects overlaps and inserts,
    /// all in one transaction.
    async fn create_checked(&self, appointment: &Appointment, scope: &DayScope, gap: Duration) -> Result<Appointment, AppError>;
    /// Same as `create_checked`, ignoring the appointment's own stored record.
    async fn update_checked(&self, appointment: &Appointment, scope: &DayScope, gap: Duration) -> Result<Appointment, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}
