use crate::domain::models::availability::AvailabilitySlot;
use serde::Serialize;

#[derive(Serialize)]
pub struct SlotsResponse {
    pub date: String,
    pub duration_secs: i64,
    pub slots: Vec<AvailabilitySlot>,
}

#[derive(Serialize)]
pub struct DateOpenResponse {
    pub date: String,
    pub open: bool,
}

#[derive(Serialize)]
pub struct RangeValidationResponse {
    pub valid: bool,
}
