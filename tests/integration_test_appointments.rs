mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use serde_json::{json, Value};

async fn open_monday(app: &TestApp) {
    app.set_working_hours(1, &[("09:00", "13:00"), ("14:00", "18:00")]).await;
}

async fn book(app: &TestApp, start: &str, minutes: i64) -> axum::response::Response {
    app.request(
        "POST",
        "/api/v1/appointments",
        Some(json!({ "patient_id": "patient-1", "start": start, "duration_secs": minutes * 60 })),
    ).await
}

async fn book_ok(app: &TestApp, start: &str, minutes: i64) -> Value {
    let res = book(app, start, minutes).await;
    assert_eq!(res.status(), StatusCode::CREATED, "booking at {} should succeed", start);
    parse_body(res).await
}

#[tokio::test]
async fn test_create_and_fetch_appointment() {
    let app = TestApp::new().await;
    open_monday(&app).await;

    let created = book_ok(&app, "2025-11-03T09:00:00Z", 30).await;
    assert_eq!(created["end_time"], "2025-11-03T09:30:00Z");
    assert_eq!(created["duration_secs"], 1800);
    let id = created["id"].as_str().unwrap();

    let fetched = parse_body(app.request("GET", &format!("/api/v1/appointments/{}", id), None).await).await;
    assert_eq!(fetched["patient_id"], "patient-1");

    let by_date = parse_body(app.request("GET", "/api/v1/appointments/date/2025-11-03", None).await).await;
    assert_eq!(by_date.as_array().unwrap().len(), 1);

    let other_day = parse_body(app.request("GET", "/api/v1/appointments/date/2025-11-04", None).await).await;
    assert!(other_day.as_array().unwrap().is_empty());

    let between = parse_body(app.request(
        "GET",
        "/api/v1/appointments?start=2025-11-03T09:15:00Z&end=2025-11-03T12:00:00Z",
        None,
    ).await).await;
    assert_eq!(between.as_array().unwrap().len(), 1);

    let res = app.request(
        "POST",
        "/api/v1/appointments",
        Some(json!({ "name": "Walk-in visitor", "start": "2025-11-03T11:00:00Z", "duration_secs": 900 })),
    ).await;
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_overlapping_appointment_is_rejected() {
    let app = TestApp::new().await;
    open_monday(&app).await;

    book_ok(&app, "2025-11-03T10:00:00Z", 30).await;

    let res = book(&app, "2025-11-03T10:15:00Z", 30).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert!(parse_body(res).await["error"].as_str().unwrap().contains("overlaps"));

    let res = book(&app, "2025-11-03T09:45:00Z", 60).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Touching intervals are fine on both sides.
    book_ok(&app, "2025-11-03T10:30:00Z", 30).await;
    book_ok(&app, "2025-11-03T09:30:00Z", 30).await;

    let day = parse_body(app.request("GET", "/api/v1/appointments/date/2025-11-03", None).await).await;
    assert_eq!(day.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_configured_gap_separates_appointments() {
    let app = TestApp::with_settings(chrono_tz::UTC, 10).await;
    open_monday(&app).await;

    book_ok(&app, "2025-11-03T10:00:00Z", 30).await;

    assert_eq!(book(&app, "2025-11-03T10:30:00Z", 30).await.status(), StatusCode::CONFLICT);
    assert_eq!(book(&app, "2025-11-03T10:35:00Z", 30).await.status(), StatusCode::CONFLICT);
    book_ok(&app, "2025-11-03T10:40:00Z", 30).await;
}

#[tokio::test]
async fn test_appointment_must_fit_business_hours() {
    let app = TestApp::new().await;
    open_monday(&app).await;

    // Straddles the lunch break.
    let res = book(&app, "2025-11-03T12:45:00Z", 30).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert!(parse_body(res).await["error"].as_str().unwrap().contains("outside business hours"));

    assert_eq!(book(&app, "2025-11-03T08:30:00Z", 60).await.status(), StatusCode::CONFLICT);
    assert_eq!(book(&app, "2025-11-03T17:45:00Z", 30).await.status(), StatusCode::CONFLICT);

    // Ending exactly at closing time is allowed.
    book_ok(&app, "2025-11-03T17:30:00Z", 30).await;
    book_ok(&app, "2025-11-03T12:30:00Z", 30).await;

    // Tuesday has no hours at all.
    let res = book(&app, "2025-11-04T10:00:00Z", 30).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert!(parse_body(res).await["error"].as_str().unwrap().contains("closed"));
}

#[tokio::test]
async fn test_closed_override_blocks_bookings() {
    let app = TestApp::new().await;
    open_monday(&app).await;

    app.request(
        "POST",
        "/api/v1/schedule/special-hours",
        Some(json!({ "date": "2025-11-10", "active": false })),
    ).await;

    let res = book(&app, "2025-11-10T10:00:00Z", 30).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let slots = parse_body(app.request("GET", "/api/v1/appointments/available-slots/2025-11-10", None).await).await;
    assert!(slots["slots"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_appointment_input() {
    let app = TestApp::new().await;
    open_monday(&app).await;

    let res = app.request(
        "POST",
        "/api/v1/appointments",
        Some(json!({ "start": "2025-11-03T10:00:00Z", "duration_secs": 900 })),
    ).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.request(
        "POST",
        "/api/v1/appointments",
        Some(json!({ "patient_id": "  ", "start": "2025-11-03T10:00:00Z", "duration_secs": 900 })),
    ).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    assert_eq!(book(&app, "2025-11-03T10:00:00Z", 0).await.status(), StatusCode::BAD_REQUEST);
    assert_eq!(book(&app, "2025-11-03T10:00:00Z", -15).await.status(), StatusCode::BAD_REQUEST);

    let res = app.request(
        "GET",
        "/api/v1/appointments?start=2025-11-04T00:00:00Z&end=2025-11-03T00:00:00Z",
        None,
    ).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.request("GET", "/api/v1/appointments?start=yesterday&end=2025-11-03T00:00:00Z", None).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.request("GET", "/api/v1/appointments/does-not-exist", None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_ignores_own_record_but_not_others() {
    let app = TestApp::new().await;
    open_monday(&app).await;

    let first = book_ok(&app, "2025-11-03T10:00:00Z", 60).await;
    let id = first["id"].as_str().unwrap().to_string();
    book_ok(&app, "2025-11-03T12:00:00Z", 30).await;

    // Overlaps only its own previous position.
    let res = app.request(
        "PUT",
        &format!("/api/v1/appointments/{}", id),
        Some(json!({ "start": "2025-11-03T10:30:00Z" })),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    let moved = parse_body(res).await;
    assert_eq!(moved["start_time"], "2025-11-03T10:30:00Z");
    assert_eq!(moved["end_time"], "2025-11-03T11:30:00Z");

    // Growing it into the 12:00 appointment fails.
    let res = app.request(
        "PUT",
        &format!("/api/v1/appointments/{}", id),
        Some(json!({ "duration_secs": 7200 })),
    ).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = app.request(
        "PUT",
        &format!("/api/v1/appointments/{}", id),
        Some(json!({ "start": "2025-11-03T13:30:00Z" })),
    ).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = app.request(
        "PUT",
        &format!("/api/v1/appointments/{}", id),
        Some(json!({ "duration_secs": 0 })),
    ).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.request(
        "PUT",
        "/api/v1/appointments/missing-id",
        Some(json!({ "start": "2025-11-03T15:00:00Z" })),
    ).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Rejected updates leave the stored record alone.
    let stored = parse_body(app.request("GET", &format!("/api/v1/appointments/{}", id), None).await).await;
    assert_eq!(stored["start_time"], "2025-11-03T10:30:00Z");
    assert_eq!(stored["duration_secs"], 3600);
}

#[tokio::test]
async fn test_durations_longer_than_a_day_are_rejected() {
    let app = TestApp::new().await;
    open_monday(&app).await;

    for secs in [i64::MAX, 86_401] {
        let res = app.request(
            "POST",
            "/api/v1/appointments",
            Some(json!({ "patient_id": "patient-1", "start": "2025-11-03T10:00:00Z", "duration_secs": secs })),
        ).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "duration {} should be rejected", secs);
    }

    let created = book_ok(&app, "2025-11-03T10:00:00Z", 30).await;
    let uri = format!("/api/v1/appointments/{}", created["id"].as_str().unwrap());
    let res = app.request("PUT", &uri, Some(json!({ "duration_secs": i64::MAX }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let stored = parse_body(app.request("GET", &uri, None).await).await;
    assert_eq!(stored["duration_secs"], 1800);
    assert_eq!(stored["end_time"], "2025-11-03T10:30:00Z");

    let res = app.request("GET", "/api/v1/appointments/available-slots/2025-11-03?duration=100000000000000", None).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // A full day is still a valid slot length; it just never fits the open ranges.
    let res = app.request("GET", "/api/v1/appointments/available-slots/2025-11-03?duration=86400", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["duration_secs"], 86_400);
    assert!(body["slots"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_appointment() {
    let app = TestApp::new().await;
    open_monday(&app).await;

    let created = book_ok(&app, "2025-11-03T10:00:00Z", 30).await;
    let uri = format!("/api/v1/appointments/{}", created["id"].as_str().unwrap());

    assert_eq!(app.request("DELETE", &uri, None).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.request("GET", &uri, None).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.request("DELETE", &uri, None).await.status(), StatusCode::NOT_FOUND);

    // The freed slot can be booked again.
    book_ok(&app, "2025-11-03T10:00:00Z", 30).await;
}

#[tokio::test]
async fn test_available_slots_follow_schedule_and_bookings() {
    let app = TestApp::new().await;
    open_monday(&app).await;
    book_ok(&app, "2025-11-03T09:00:00Z", 30).await;

    let res = app.request("GET", "/api/v1/appointments/available-slots/2025-11-03", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["duration_secs"], 900);

    let slots = body["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 32);
    assert_eq!(slots[0]["start"], "2025-11-03T09:00:00Z");
    assert_eq!(slots[0]["available"], false);
    assert_eq!(slots[1]["available"], false);
    assert_eq!(slots[2]["available"], true);
    // No slot inside the lunch break.
    assert!(slots.iter().all(|s| !s["start"].as_str().unwrap().starts_with("2025-11-03T13:")));
    assert_eq!(slots[31]["end"], "2025-11-03T18:00:00Z");

    let hourly = parse_body(app.request("GET", "/api/v1/appointments/available-slots/2025-11-03?duration=3600", None).await).await;
    assert_eq!(hourly["slots"].as_array().unwrap().len(), 8);

    let fallback = parse_body(app.request("GET", "/api/v1/appointments/available-slots/2025-11-03?duration=-5", None).await).await;
    assert_eq!(fallback["duration_secs"], 900);
    assert_eq!(fallback["slots"].as_array().unwrap().len(), 32);

    let tuesday = parse_body(app.request("GET", "/api/v1/appointments/available-slots/2025-11-04?duration=0", None).await).await;
    assert_eq!(tuesday["duration_secs"], 900);
    assert!(tuesday["slots"].as_array().unwrap().is_empty());

    let res = app.request("GET", "/api/v1/appointments/available-slots/2025-11-03?duration=abc", None).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_full_business_day_yields_forty_slots() {
    let app = TestApp::new().await;
    app.set_working_hours(3, &[("08:00", "18:00")]).await;

    let body = parse_body(app.request("GET", "/api/v1/appointments/available-slots/2025-11-05?duration=900", None).await).await;
    let slots = body["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 40);
    assert!(slots.iter().all(|s| s["available"] == true));
}

#[tokio::test]
async fn test_clinic_timezone_is_applied() {
    let tz: chrono_tz::Tz = "America/Guatemala".parse().unwrap();
    let app = TestApp::with_settings(tz, 0).await;
    app.set_working_hours(1, &[("09:00", "17:00")]).await;

    // 15:00Z is 09:00 in Guatemala (UTC-6).
    book_ok(&app, "2025-11-03T15:00:00Z", 30).await;
    // 09:00Z is 03:00 local.
    assert_eq!(book(&app, "2025-11-03T09:00:00Z", 30).await.status(), StatusCode::CONFLICT);
    // 22:30Z is 16:30 local, ending right at closing.
    book_ok(&app, "2025-11-03T22:30:00Z", 30).await;
    // 02:00Z on the 4th is still Monday evening locally, after closing.
    assert_eq!(book(&app, "2025-11-04T02:00:00Z", 30).await.status(), StatusCode::CONFLICT);

    let day = parse_body(app.request("GET", "/api/v1/appointments/date/2025-11-03", None).await).await;
    assert_eq!(day.as_array().unwrap().len(), 2);

    let body = parse_body(app.request("GET", "/api/v1/appointments/available-slots/2025-11-03?duration=1800", None).await).await;
    let slots = body["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 16);
    assert_eq!(slots[0]["start"], "2025-11-03T15:00:00Z");
    assert_eq!(slots[0]["available"], false);
    assert_eq!(slots[15]["available"], false);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_bookings_for_one_slot_admit_exactly_one() {
    let app = TestApp::new().await;
    open_monday(&app).await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let router = app.router.clone();
        handles.push(tokio::spawn(async move {
            use axum::body::Body;
            use axum::http::{header, Request};
            use tower::ServiceExt;

            let payload = json!({
                "patient_id": format!("patient-{}", i),
                "start": "2025-11-03T11:00:00Z",
                "duration_secs": 1800,
            });
            router.oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/appointments")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap()
            ).await.unwrap().status()
        }));
    }

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::CREATED => created += 1,
            StatusCode::CONFLICT => conflicts += 1,
            other => panic!("unexpected status {}", other),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(conflicts, 7);

    let day = parse_body(app.request("GET", "/api/v1/appointments/date/2025-11-03", None).await).await;
    assert_eq!(day.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_today_lists_current_clinic_day() {
    let app = TestApp::new().await;
    let res = app.request("GET", "/api/v1/appointments/today", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(parse_body(res).await.as_array().is_some());
}
