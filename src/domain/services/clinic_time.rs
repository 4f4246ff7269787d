use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use crate::error::AppError;

/// ISO weekday, 1 = Monday .. 7 = Sunday.
pub fn iso_weekday(date: NaiveDate) -> i32 {
    match date.weekday().num_days_from_sunday() {
        0 => 7,
        n => n as i32,
    }
}

pub fn minutes_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Local wall-clock time in the clinic zone to an instant.
/// `None` when the wall-clock time does not exist (DST gap).
pub fn local_to_utc(tz: Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Calendar date and time of day of an instant, as seen from the clinic.
pub fn utc_to_local(tz: Tz, instant: DateTime<Utc>) -> (NaiveDate, NaiveTime) {
    let local = instant.with_timezone(&tz);
    (local.date_naive(), local.time())
}

/// `[start, end)` of a clinic-local calendar day.
pub fn day_bounds(tz: Tz, date: NaiveDate) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    let next = date.succ_opt()
        .ok_or_else(|| AppError::Validation("Date out of range".into()))?;
    Ok((start_of_day(tz, date)?, start_of_day(tz, next)?))
}

fn start_of_day(tz: Tz, date: NaiveDate) -> Result<DateTime<Utc>, AppError> {
    // Some zones skip local midnight on DST days; the day then starts at the first valid hour.
    (0..3)
        .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
        .find_map(|time| local_to_utc(tz, date, time))
        .ok_or_else(|| AppError::InternalWithMsg(format!("Cannot resolve start of day {} in {}", date, tz)))
}
