use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{parse_ranges, SpecialDayRequest, ValidateRangeRequest, WorkDayRequest};
use crate::api::dtos::responses::{DateOpenResponse, RangeValidationResponse};
use crate::api::handlers::parse_date;
use crate::domain::models::time_range::parse_time_of_day;
use crate::error::AppError;
use std::sync::Arc;
use std::collections::HashMap;
use chrono::NaiveDate;

fn date_param(params: &HashMap<String, String>, key: &str) -> Result<NaiveDate, AppError> {
    let raw = params.get(key).ok_or_else(|| AppError::Validation(format!("{} required", key)))?;
    parse_date(raw)
}

pub async fn list_working_hours(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let days = state.schedule_service.working_hours().await?;
    Ok(Json(days))
}

pub async fn replace_working_hours(
    State(state): State<Arc<AppState>>,
    Path(day_of_week): Path<i32>,
    Json(payload): Json<WorkDayRequest>,
) -> Result<impl IntoResponse, AppError> {
    let ranges = parse_ranges(&payload.ranges)?;
    let day = state.schedule_service
        .replace_work_day(day_of_week, ranges, payload.active.unwrap_or(true))
        .await?;
    Ok(Json(day))
}

pub async fn list_special_hours(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let start = date_param(&params, "start")?;
    let end = date_param(&params, "end")?;

    let days = state.schedule_service.special_hours_between(start, end).await?;
    Ok(Json(days))
}

pub async fn create_special_hours(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SpecialDayRequest>,
) -> Result<impl IntoResponse, AppError> {
    let raw_date = payload.date.as_deref().ok_or_else(|| AppError::Validation("date required".into()))?;
    let date = parse_date(raw_date)?;
    let ranges = parse_ranges(&payload.ranges)?;

    let day = state.schedule_service
        .replace_special_day(date, ranges, payload.active.unwrap_or(true))
        .await?;
    Ok((StatusCode::CREATED, Json(day)))
}

pub async fn replace_special_hours(
    State(state): State<Arc<AppState>>,
    Path(date_str): Path<String>,
    Json(payload): Json<SpecialDayRequest>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(&date_str)?;
    let ranges = parse_ranges(&payload.ranges)?;

    let day = state.schedule_service
        .replace_special_day(date, ranges, payload.active.unwrap_or(true))
        .await?;
    Ok(Json(day))
}

pub async fn delete_special_hours(
    State(state): State<Arc<AppState>>,
    Path(date_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(&date_str)?;
    state.schedule_service.delete_special_day(date).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_effective_day(
    State(state): State<Arc<AppState>>,
    Path(date_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(&date_str)?;
    let day = state.schedule_service.effective_day(date).await?;
    Ok(Json(day))
}

pub async fn get_effective_range(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let start = date_param(&params, "start")?;
    let end = date_param(&params, "end")?;

    let days = state.schedule_service.effective_range(start, end).await?;
    Ok(Json(days))
}

pub async fn validate_date(
    State(state): State<Arc<AppState>>,
    Path(date_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(&date_str)?;
    let open = state.schedule_service.is_date_open(date).await?;
    Ok(Json(DateOpenResponse { date: date_str, open }))
}

/// 200 with `valid: true` when the interval fits; otherwise the 409 explains why.
pub async fn validate_range(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ValidateRangeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(&payload.date)?;
    let start = parse_time_of_day(&payload.start)?;
    let end = parse_time_of_day(&payload.end)?;

    let valid = state.schedule_service.is_within_business_hours(date, start, end).await?;
    Ok(Json(RangeValidationResponse { valid }))
}
