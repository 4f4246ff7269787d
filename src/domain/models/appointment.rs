use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A booked visit. Occupies `[start_time, start_time + duration_secs)`;
/// `end_time` is stored alongside so range queries stay in SQL.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Appointment {
    pub id: String,
    pub patient_id: Option<String>,
    pub name: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_secs: i64,
    pub created_at: DateTime<Utc>,
}

pub struct NewAppointmentParams {
    pub patient_id: Option<String>,
    pub name: Option<String>,
    pub start: DateTime<Utc>,
    pub duration_secs: i64,
}

impl Appointment {
    pub fn new(params: NewAppointmentParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            patient_id: params.patient_id,
            name: params.name,
            start_time: params.start,
            end_time: params.start + Duration::seconds(params.duration_secs),
            duration_secs: params.duration_secs,
            created_at: Utc::now(),
        }
    }

    pub fn reschedule(&mut self, start: DateTime<Utc>, duration_secs: i64) {
        self.start_time = start;
        self.duration_secs = duration_secs;
        self.end_time = start + Duration::seconds(duration_secs);
    }
}
