use chrono::{Duration, NaiveDateTime};
use chrono_tz::Tz;
use crate::domain::models::{appointment::Appointment, availability::AvailabilitySlot, effective_day::EffectiveDay};
use crate::domain::services::conflict::find_conflict;
use crate::domain::services::clinic_time::local_to_utc;

pub const DEFAULT_SLOT_SECS: i64 = 900;
/// No slot or appointment can outlast a clinic day.
pub const MAX_SLOT_SECS: i64 = 24 * 60 * 60;

/// Slot length actually used for a requested duration: non-positive values fall
/// back to 15 minutes, anything longer than a day is capped at one day.
pub fn effective_slot_secs(slot_secs: i64) -> i64 {
    if slot_secs <= 0 { DEFAULT_SLOT_SECS } else { slot_secs.min(MAX_SLOT_SECS) }
}

/// Splits every open range of the day into consecutive slots of `slot_secs`
/// and marks the ones an appointment collides with.
///
/// Closed days yield nothing. The duration goes through `effective_slot_secs`.
/// A trailing slot that would run past the range's closing time is dropped, and
/// wall-clock times skipped by a DST jump produce no slot.
pub fn calculate_slots(
    day: &EffectiveDay,
    tz: Tz,
    appointments: &[Appointment],
    slot_secs: i64,
    gap: Duration,
) -> Vec<AvailabilitySlot> {
    if !day.active {
        return Vec::new();
    }

    let step = Duration::seconds(effective_slot_secs(slot_secs));
    let mut slots = Vec::new();

    for range in &day.ranges {
        let close: NaiveDateTime = day.date.and_time(range.end);
        let mut cursor: NaiveDateTime = day.date.and_time(range.start);

        while cursor + step <= close {
            let next = cursor + step;

            if let (Some(start), Some(end)) = (
                local_to_utc(tz, cursor.date(), cursor.time()),
                local_to_utc(tz, next.date(), next.time()),
            ) {
                let available = find_conflict(start, end, appointments, None, gap).is_none();
                slots.push(AvailabilitySlot { start, end, available });
            }

            cursor = next;
        }
    }

    slots.sort_by_key(|s| s.start);
    slots.dedup_by_key(|s| s.start);
    slots
}
