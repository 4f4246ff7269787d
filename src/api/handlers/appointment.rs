use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{CreateAppointmentRequest, UpdateAppointmentRequest};
use crate::api::dtos::responses::SlotsResponse;
use crate::api::handlers::parse_date;
use crate::domain::models::appointment::NewAppointmentParams;
use crate::domain::services::availability::DEFAULT_SLOT_SECS;
use crate::error::AppError;
use std::sync::Arc;
use std::collections::HashMap;
use chrono::{DateTime, Utc};

fn instant_param(params: &HashMap<String, String>, key: &str) -> Result<DateTime<Utc>, AppError> {
    let raw = params.get(key).ok_or_else(|| AppError::Validation(format!("{} required", key)))?;
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::Validation(format!("Invalid {}, expected RFC 3339", key)))
}

pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let start = instant_param(&params, "start")?;
    let end = instant_param(&params, "end")?;

    let appointments = state.appointment_service.get_between(start, end).await?;
    Ok(Json(appointments))
}

pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let created = state.appointment_service.create(NewAppointmentParams {
        patient_id: payload.patient_id,
        name: payload.name,
        start: payload.start,
        duration_secs: payload.duration_secs,
    }).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_today(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let appointments = state.appointment_service.get_today().await?;
    Ok(Json(appointments))
}

pub async fn list_by_date(
    State(state): State<Arc<AppState>>,
    Path(date_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(&date_str)?;
    let appointments = state.appointment_service.get_by_date(date).await?;
    Ok(Json(appointments))
}

pub async fn get_available_slots(
    State(state): State<Arc<AppState>>,
    Path(date_str): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(&date_str)?;
    let duration_secs = match params.get("duration") {
        Some(raw) => raw.parse::<i64>()
            .map_err(|_| AppError::Validation("duration must be a number of seconds".into()))?,
        None => DEFAULT_SLOT_SECS,
    };

    let (duration_secs, slots) = state.appointment_service.available_slots(date, duration_secs).await?;

    Ok(Json(SlotsResponse {
        date: date_str,
        duration_secs,
        slots,
    }))
}

pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let appointment = state.appointment_service.get_by_id(&id).await?;
    Ok(Json(appointment))
}

pub async fn update_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.appointment_service
        .update(&id, payload.start, payload.duration_secs)
        .await?;
    Ok(Json(updated))
}

pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.appointment_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
