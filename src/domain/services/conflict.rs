use chrono::{DateTime, Duration, Utc};
use tracing::warn;
use crate::domain::models::appointment::Appointment;
use crate::error::AppError;

/// Strict overlap: intervals that only touch do not overlap.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// First existing appointment that `[start, end)` collides with. Each existing
/// appointment's end is pushed back by `gap`.
pub fn find_conflict<'a>(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    existing: &'a [Appointment],
    exclude_id: Option<&str>,
    gap: Duration,
) -> Option<&'a Appointment> {
    existing.iter()
        .filter(|a| exclude_id != Some(a.id.as_str()))
        .find(|a| overlaps(start, end, a.start_time, a.end_time + gap))
}

pub fn ensure_no_conflict(
    candidate: &Appointment,
    existing: &[Appointment],
    exclude_id: Option<&str>,
    gap: Duration,
) -> Result<(), AppError> {
    if let Some(taken) = find_conflict(candidate.start_time, candidate.end_time, existing, exclude_id, gap) {
        warn!(
            candidate_start = %candidate.start_time,
            candidate_end = %candidate.end_time,
            existing_id = %taken.id,
            "Appointment rejected: overlaps an existing appointment"
        );
        return Err(AppError::Conflict("The requested time overlaps an existing appointment".into()));
    }
    Ok(())
}
