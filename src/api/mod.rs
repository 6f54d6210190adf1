//! HTTP API handlers
//!
//! JSON endpoints the browser client calls. Each handler forwards to the
//! shared [`ScheduleBackend`](crate::gateway::ScheduleBackend); failures come
//! back as `{"error": "..."}` with a status picked by [`BackendError`].

mod extract;

use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::NaiveDate;
use schedule_types::{
    ActivityDetail, ActivityDetailInput, ActivityId, ActivityMeta, Booking, BookingId,
    CreateBookingInput, CreateUserInput, DeleteIds, Deleted, EditBookingInput, EditUserInput,
    AuthSession, LoginInput, RegisterInput, User, UserId,
};
use serde::{Deserialize, Serialize};

use crate::error::BackendError;
use crate::gateway::SharedBackend;

pub use extract::{ApiJson, ApiPath, ApiQuery, Bearer};

type ApiResult<T> = Result<Json<T>, BackendError>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub backend: SharedBackend,
    started: Instant,
}

impl AppState {
    pub fn new(backend: SharedBackend) -> Self {
        Self {
            backend,
            started: Instant::now(),
        }
    }
}

/// General status response
#[derive(Serialize)]
pub struct StatusResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub backend: &'static str,
    pub uptime_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    #[serde(default)]
    pub name: String,
}

/// GET /api/status - Service health check
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        service: "dive-schedule",
        version: env!("CARGO_PKG_VERSION"),
        backend: state.backend.name(),
        uptime_secs: state.started.elapsed().as_secs(),
    })
}

/// GET /api/activities?date=YYYY-MM-DD - Activities scheduled on a day
pub async fn daily_activities_handler(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DateQuery>,
) -> ApiResult<Vec<ActivityMeta>> {
    Ok(Json(state.backend.daily_activities(query.date).await?))
}

/// GET /api/activities/{id}
pub async fn activity_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ActivityDetail> {
    Ok(Json(state.backend.activity(ActivityId(id)).await?))
}

/// POST /api/activities
pub async fn create_activity_handler(
    State(state): State<AppState>,
    Bearer(auth): Bearer,
    ApiJson(mut input): ApiJson<ActivityDetailInput>,
) -> Result<(StatusCode, Json<ActivityDetail>), BackendError> {
    input.id = None;
    let created = state.backend.create_activity_detail(&auth, input).await?;
    tracing::info!(id = %created.id, activity_type = %created.activity_type, "Activity created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/activities/{id}
pub async fn edit_activity_handler(
    State(state): State<AppState>,
    Bearer(auth): Bearer,
    ApiPath(id): ApiPath<i64>,
    ApiJson(mut input): ApiJson<ActivityDetailInput>,
) -> ApiResult<ActivityDetail> {
    input.id = Some(ActivityId(id));
    Ok(Json(state.backend.edit_activity_detail(&auth, input).await?))
}

/// POST /api/bookings
pub async fn create_booking_handler(
    State(state): State<AppState>,
    Bearer(auth): Bearer,
    ApiJson(input): ApiJson<CreateBookingInput>,
) -> Result<(StatusCode, Json<Booking>), BackendError> {
    let booking = state.backend.create_booking(&auth, input).await?;
    tracing::info!(id = %booking.id, diver = booking.diver.full_name(), "Booking created");
    Ok((StatusCode::CREATED, Json(booking)))
}

/// PUT /api/bookings/{id}
pub async fn edit_booking_handler(
    State(state): State<AppState>,
    Bearer(auth): Bearer,
    ApiPath(id): ApiPath<i64>,
    ApiJson(mut input): ApiJson<EditBookingInput>,
) -> ApiResult<Booking> {
    input.id = BookingId(id);
    Ok(Json(state.backend.edit_booking(&auth, input).await?))
}

/// POST /api/bookings/delete - Delete every listed booking in one call
pub async fn delete_bookings_handler(
    State(state): State<AppState>,
    Bearer(auth): Bearer,
    ApiJson(body): ApiJson<DeleteIds<BookingId>>,
) -> ApiResult<Deleted> {
    if body.ids.is_empty() {
        return Err(BackendError::Invalid("no bookings selected".to_string()));
    }
    let deleted = state.backend.delete_bookings(&auth, &body.ids).await?;
    tracing::info!(deleted, "Bookings deleted");
    Ok(Json(Deleted { deleted }))
}

/// GET /api/users
pub async fn users_handler(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    Ok(Json(state.backend.users().await?))
}

/// GET /api/users/search?name=
pub async fn search_users_handler(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<NameQuery>,
) -> ApiResult<Vec<User>> {
    Ok(Json(state.backend.search_users(&query.name).await?))
}

/// GET /api/users/{id}
pub async fn user_handler(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> ApiResult<User> {
    Ok(Json(state.backend.user(UserId(id)).await?))
}

/// POST /api/users
pub async fn create_user_handler(
    State(state): State<AppState>,
    Bearer(auth): Bearer,
    ApiJson(input): ApiJson<CreateUserInput>,
) -> Result<(StatusCode, Json<User>), BackendError> {
    let user = state.backend.create_user(&auth, input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /api/users/{id}
pub async fn edit_user_handler(
    State(state): State<AppState>,
    Bearer(auth): Bearer,
    ApiPath(id): ApiPath<i64>,
    ApiJson(mut input): ApiJson<EditUserInput>,
) -> ApiResult<User> {
    input.id = UserId(id);
    Ok(Json(state.backend.edit_user(&auth, input).await?))
}

/// POST /api/users/delete
pub async fn delete_users_handler(
    State(state): State<AppState>,
    Bearer(auth): Bearer,
    ApiJson(body): ApiJson<DeleteIds<UserId>>,
) -> ApiResult<Deleted> {
    if body.ids.is_empty() {
        return Err(BackendError::Invalid("no users selected".to_string()));
    }
    let deleted = state.backend.delete_users(&auth, &body.ids).await?;
    tracing::info!(deleted, "Users deleted");
    Ok(Json(Deleted { deleted }))
}

/// POST /api/auth/login - Returns the user and the session token to send
/// back as `Authorization: Bearer <token>` on changes
pub async fn login_handler(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginInput>,
) -> ApiResult<AuthSession> {
    let session = state.backend.login(input).await?;
    tracing::info!(
        id = %session.user.id,
        admin = session.user.has_admin_role(),
        "User logged in"
    );
    Ok(Json(session))
}

/// POST /api/auth/register
pub async fn register_handler(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<RegisterInput>,
) -> Result<(StatusCode, Json<User>), BackendError> {
    let user = state.backend.register(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// All `/api` routes bound to `state`. Middleware is added by the caller.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .route(
            "/api/activities",
            get(daily_activities_handler).post(create_activity_handler),
        )
        .route(
            "/api/activities/{id}",
            get(activity_handler).put(edit_activity_handler),
        )
        .route("/api/bookings", post(create_booking_handler))
        .route("/api/bookings/delete", post(delete_bookings_handler))
        .route("/api/bookings/{id}", put(edit_booking_handler))
        .route("/api/users", get(users_handler).post(create_user_handler))
        .route("/api/users/search", get(search_users_handler))
        .route("/api/users/delete", post(delete_users_handler))
        .route("/api/users/{id}", get(user_handler).put(edit_user_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/register", post(register_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryBackend;
    use std::sync::Arc;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, 25).unwrap()
    }

    fn app() -> Router {
        router(AppState::new(Arc::new(MemoryBackend::with_demo_data(day()))))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        send_as(app, None, method, uri, body).await
    }

    async fn send_as(
        app: &Router,
        token: Option<&str>,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn login(app: &Router, email: &str, password: &str) -> String {
        let (status, session) = send(
            app,
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": email, "password": password })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        session["token"].as_str().unwrap().to_string()
    }

    async fn admin(app: &Router) -> String {
        login(app, "admin@diveschedule.test", "admin").await
    }

    async fn am_boat(app: &Router) -> Value {
        let (_, metas) = send(app, Method::GET, "/api/activities?date=2021-03-25", None).await;
        let id = metas
            .as_array()
            .unwrap()
            .iter()
            .find(|m| m["activityType"] == "AM_BOAT")
            .unwrap()["id"]
            .as_i64()
            .unwrap();
        let (status, activity) = send(app, Method::GET, &format!("/api/activities/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        activity
    }

    #[tokio::test]
    async fn test_status() {
        let (status, body) = send(&app(), Method::GET, "/api/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "dive-schedule");
        assert_eq!(body["backend"], "memory");
    }

    #[tokio::test]
    async fn test_missing_activity_is_404_with_message() {
        let (status, body) = send(&app(), Method::GET, "/api/activities/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "activity 999 not found");
    }

    #[tokio::test]
    async fn test_create_then_delete_bookings() {
        let app = app();
        let token = admin(&app).await;
        let boat = am_boat(&app).await;
        assert_eq!(boat["bookingSet"].as_array().unwrap().len(), 2);
        let diver_id = boat["bookingSet"][0]["diver"]["id"].clone();

        let (status, booking) = send_as(
            &app,
            Some(&token),
            Method::POST,
            "/api/bookings",
            Some(json!({
                "diverRole": "snorkel",
                "userId": diver_id,
                "activityType": "AM_BOAT",
                "date": "2021-03-25",
                "time": "9am"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(booking["diverRole"], "snorkel");

        let ids: Vec<Value> = am_boat(&app).await["bookingSet"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["id"].clone())
            .collect();
        assert_eq!(ids.len(), 3);

        let (status, body) = send_as(
            &app,
            Some(&token),
            Method::POST,
            "/api/bookings/delete",
            Some(json!({ "ids": ids })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleted"], 3);
        assert!(am_boat(&app).await["bookingSet"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_delete_is_rejected() {
        let app = app();
        let token = admin(&app).await;
        let (status, _) = send_as(
            &app,
            Some(&token),
            Method::POST,
            "/api/bookings/delete",
            Some(json!({ "ids": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_edit_booking_uses_path_id() {
        let app = app();
        let boat = am_boat(&app).await;
        let id = boat["bookingSet"][1]["id"].as_i64().unwrap();
        let token = admin(&app).await;

        let (status, booking) = send_as(
            &app,
            Some(&token),
            Method::PUT,
            &format!("/api/bookings/{}", id),
            Some(json!({ "id": 0, "equipment": "Rental fins" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(booking["id"], id);
        assert_eq!(booking["equipment"], "Rental fins");
    }

    #[tokio::test]
    async fn test_search_users() {
        let (status, users) = send(&app(), Method::GET, "/api/users/search?name=reef", None).await;
        assert_eq!(status, StatusCode::OK);
        let users = users.as_array().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["profile"]["fullName"], "Sam Reef");
    }

    #[tokio::test]
    async fn test_login() {
        let app = app();
        let (status, user) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": "admin@diveschedule.test", "password": "admin" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["user"]["isAdmin"], true);
        assert!(!user["token"].as_str().unwrap().is_empty());

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": "admin@diveschedule.test", "password": "wrong" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "invalid email or password");
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/auth/register",
            Some(json!({
                "fullName": "Ana Again",
                "email": "ana@diveschedule.test",
                "password": "pw"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "User email already exists");
    }

    #[tokio::test]
    async fn test_bad_date_query_is_json_error() {
        let (status, body) = send(&app(), Method::GET, "/api/activities?date=not-a-date", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("date"));
    }

    #[tokio::test]
    async fn test_bad_path_id_is_json_error() {
        let (status, body) = send(&app(), Method::GET, "/api/users/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_delete_body_is_json_error() {
        let app = app();
        let token = admin(&app).await;
        let (status, body) = send_as(
            &app,
            Some(&token),
            Method::POST,
            "/api/bookings/delete",
            Some(json!({ "ids": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert_eq!(am_boat(&app).await["bookingSet"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_changes_without_token_are_unauthorized() {
        let app = app();
        let ids: Vec<Value> = am_boat(&app).await["bookingSet"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["id"].clone())
            .collect();

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/bookings/delete",
            Some(json!({ "ids": ids })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "sign in to make changes");

        let (status, _) = send_as(
            &app,
            Some("forged"),
            Method::POST,
            "/api/bookings/delete",
            Some(json!({ "ids": ids })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(am_boat(&app).await["bookingSet"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_non_admin_cannot_change_schedule() {
        let app = app();
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/auth/register",
            Some(json!({
                "fullName": "Ria Kelp",
                "email": "ria@example.com",
                "password": "pw"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let token = login(&app, "ria@example.com", "pw").await;

        let boat = am_boat(&app).await;
        let id = boat["bookingSet"][0]["id"].as_i64().unwrap();
        let (status, body) = send_as(
            &app,
            Some(&token),
            Method::PUT,
            &format!("/api/bookings/{}", id),
            Some(json!({ "id": 0, "equipment": "Own fins" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body["error"].is_string());
    }
}
