use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, schedule, appointment};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Weekly schedule
        .route("/api/v1/schedule/working-hours", get(schedule::list_working_hours))
        .route("/api/v1/schedule/working-hours/{day_of_week}", put(schedule::replace_working_hours))

        // Date overrides
        .route("/api/v1/schedule/special-hours", get(schedule::list_special_hours).post(schedule::create_special_hours))
        .route("/api/v1/schedule/special-hours/{date}", put(schedule::replace_special_hours).delete(schedule::delete_special_hours))

        // Resolution & validation
        .route("/api/v1/schedule/effective/day/{date}", get(schedule::get_effective_day))
        .route("/api/v1/schedule/effective/range", get(schedule::get_effective_range))
        .route("/api/v1/schedule/validate/date/{date}", get(schedule::validate_date))
        .route("/api/v1/schedule/validate/range", post(schedule::validate_range))

        // Appointments
        .route("/api/v1/appointments", get(appointment::list_appointments).post(appointment::create_appointment))
        .route("/api/v1/appointments/today", get(appointment::list_today))
        .route("/api/v1/appointments/date/{date}", get(appointment::list_by_date))
        .route("/api/v1/appointments/available-slots/{date}", get(appointment::get_available_slots))
        .route("/api/v1/appointments/{id}", get(appointment::get_appointment).put(appointment::update_appointment).delete(appointment::delete_appointment))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
