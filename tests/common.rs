use clinic_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    infra::repositories::{
        sqlite_appointment_repo::SqliteAppointmentRepo,
        sqlite_schedule_repo::SqliteScheduleRepo,
    },
};
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use chrono_tz::Tz;
use serde_json::Value;
use tower::ServiceExt;

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    /// Clinic on UTC with no gap between appointments.
    pub async fn new() -> Self {
        Self::with_settings(chrono_tz::UTC, 0).await
    }

    pub async fn with_settings(clinic_tz: Tz, appointment_gap_min: i64) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(10));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            clinic_tz,
            appointment_gap_min,
        };

        let state = Arc::new(AppState::new(
            config,
            Arc::new(SqliteScheduleRepo::new(pool.clone())),
            Arc::new(SqliteAppointmentRepo::new(pool.clone())),
        ).expect("Failed to build app state"));

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Replaces a weekday's hours, panicking unless the server accepts it.
    pub async fn set_working_hours(&self, day_of_week: i32, ranges: &[(&str, &str)]) {
        let ranges: Vec<Value> = ranges.iter()
            .map(|(start, end)| serde_json::json!({ "start": start, "end": end }))
            .collect();
        let res = self.request(
            "PUT",
            &format!("/api/v1/schedule/working-hours/{}", day_of_week),
            Some(serde_json::json!({ "ranges": ranges, "active": true })),
        ).await;
        assert_eq!(res.status(), StatusCode::OK, "setting working hours for day {} failed", day_of_week);
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
