pub mod appointment;
pub mod health;
pub mod schedule;

use chrono::NaiveDate;
use crate::error::AppError;

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}
