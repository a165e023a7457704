//! Axum handlers for the COMPASS habit API.
//!
//! Guard and eligibility outcomes map to 409 with a stable error code; the
//! client renders those as alternate control states (check / lock / trophy),
//! not error banners. Validation maps to 400, missing habits to 404, storage
//! failures to 500.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::{
    CompleteHabitRequest, CreateHabitRequest, DayPeriodResponse, ErrorResponse, HabitListResponse,
    SetReminderRequest,
};
use tracing::info;

use crate::domain::commands::habit::{CreateHabitCommand, ReminderSpec};
use crate::domain::day_period;
use crate::domain::habit_service::HabitService;
use crate::domain::models::habit::HabitError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub habit_service: HabitService,
}

impl AppState {
    pub fn new(habit_service: HabitService) -> Self {
        Self { habit_service }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/habits", get(list_habits).post(create_habit))
        .route("/habits/:id", delete(delete_habit))
        .route("/habits/:id/complete", post(complete_habit))
        .route("/habits/:id/toggle-active", post(toggle_active))
        .route("/habits/:id/toggle-home", post(toggle_show_on_home))
        .route("/habits/:id/reminder", put(set_reminder))
        .route("/day-period", get(get_day_period))
}

fn habit_error_response(e: HabitError) -> (StatusCode, Json<ErrorResponse>) {
    match e {
        HabitError::Validation(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("validation", msg)),
        ),
        HabitError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("not_found", format!("habit {} not found", id))),
        ),
        HabitError::AlreadyCompletedToday => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::new(
                "already_completed_today",
                "habit already completed today",
            )),
        ),
        HabitError::NotEligible(block) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::new("not_eligible", block.to_string())),
        ),
        HabitError::Persistence(err) => {
            tracing::error!("Storage failure: {:?}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("persistence", "storage operation failed")),
            )
        }
    }
}

/// Parse an optional client-local "YYYY-MM-DD" date, defaulting to the
/// server's local calendar date.
fn resolve_date(date: Option<&str>) -> Result<NaiveDate, HabitError> {
    match date {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| HabitError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", s))),
        None => Ok(HabitService::today()),
    }
}

/// Query parameters for the habit list endpoint
#[derive(Deserialize, Debug)]
pub struct HabitListQuery {
    pub owner_id: i64,
}

/// Axum handler for GET /api/habits
pub async fn list_habits(
    State(state): State<AppState>,
    Query(query): Query<HabitListQuery>,
) -> impl IntoResponse {
    info!("GET /api/habits - owner_id: {}", query.owner_id);

    match state
        .habit_service
        .list_habits(query.owner_id, HabitService::today())
        .await
    {
        Ok(habits) => (StatusCode::OK, Json(HabitListResponse { habits })).into_response(),
        Err(e) => habit_error_response(e).into_response(),
    }
}

/// Axum handler for POST /api/habits
pub async fn create_habit(
    State(state): State<AppState>,
    Json(request): Json<CreateHabitRequest>,
) -> impl IntoResponse {
    info!("POST /api/habits - owner_id: {}, title: {:?}", request.owner_id, request.title);

    let command = CreateHabitCommand {
        owner_id: request.owner_id,
        title: request.title,
        icon: request.icon,
        color: request.color,
        duration: request.duration,
        reminder: request.reminder.map(|r| ReminderSpec {
            enabled: r.enabled,
            time: r.time,
        }),
    };

    match state.habit_service.create_habit(command).await {
        Ok(habit) => (StatusCode::CREATED, Json(habit)).into_response(),
        Err(e) => habit_error_response(e).into_response(),
    }
}

/// Axum handler for POST /api/habits/:id/complete
pub async fn complete_habit(
    State(state): State<AppState>,
    Path(habit_id): Path<i64>,
    Json(request): Json<CompleteHabitRequest>,
) -> impl IntoResponse {
    info!("POST /api/habits/{}/complete - date: {:?}", habit_id, request.date);

    let result = match resolve_date(request.date.as_deref()) {
        Ok(date) => state.habit_service.complete_habit(habit_id, date).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(habit) => (StatusCode::OK, Json(habit)).into_response(),
        Err(e) => habit_error_response(e).into_response(),
    }
}

/// Axum handler for POST /api/habits/:id/toggle-active
pub async fn toggle_active(
    State(state): State<AppState>,
    Path(habit_id): Path<i64>,
) -> impl IntoResponse {
    info!("POST /api/habits/{}/toggle-active", habit_id);

    match state
        .habit_service
        .toggle_active(habit_id, HabitService::today())
        .await
    {
        Ok(habit) => (StatusCode::OK, Json(habit)).into_response(),
        Err(e) => habit_error_response(e).into_response(),
    }
}

/// Axum handler for POST /api/habits/:id/toggle-home
pub async fn toggle_show_on_home(
    State(state): State<AppState>,
    Path(habit_id): Path<i64>,
) -> impl IntoResponse {
    info!("POST /api/habits/{}/toggle-home", habit_id);

    match state
        .habit_service
        .toggle_show_on_home(habit_id, HabitService::today())
        .await
    {
        Ok(habit) => (StatusCode::OK, Json(habit)).into_response(),
        Err(e) => habit_error_response(e).into_response(),
    }
}

/// Axum handler for DELETE /api/habits/:id
pub async fn delete_habit(
    State(state): State<AppState>,
    Path(habit_id): Path<i64>,
) -> impl IntoResponse {
    info!("DELETE /api/habits/{}", habit_id);

    match state.habit_service.delete_habit(habit_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => habit_error_response(e).into_response(),
    }
}

/// Axum handler for PUT /api/habits/:id/reminder
pub async fn set_reminder(
    State(state): State<AppState>,
    Path(habit_id): Path<i64>,
    Json(request): Json<SetReminderRequest>,
) -> impl IntoResponse {
    info!("PUT /api/habits/{}/reminder - enabled: {}, time: {}", habit_id, request.enabled, request.time);

    match state
        .habit_service
        .set_reminder(habit_id, request.enabled, request.time)
        .await
    {
        Ok(reminder) => (StatusCode::OK, Json(reminder)).into_response(),
        Err(e) => habit_error_response(e).into_response(),
    }
}

/// Axum handler for GET /api/day-period
pub async fn get_day_period() -> impl IntoResponse {
    let (period, hour) = day_period::current_period();
    (StatusCode::OK, Json(DayPeriodResponse { period, hour }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::completion_guard::CompletionGuard;
    use crate::storage::sqlite::{
        HabitRepository, MarkerRepository, ReminderRepository, SqliteConnection,
    };
    use std::sync::Arc;

    async fn setup_test_state() -> AppState {
        let connection = SqliteConnection::init_test()
            .await
            .expect("Failed to create test database");
        let habits = Arc::new(HabitRepository::new(connection.clone()));
        let reminders = Arc::new(ReminderRepository::new(connection.clone()));
        let guard = CompletionGuard::new(Arc::new(MarkerRepository::new(connection)));
        AppState::new(HabitService::new(habits, reminders, guard))
    }

    fn create_request(title: &str, duration: u32) -> CreateHabitRequest {
        CreateHabitRequest {
            owner_id: 42,
            title: title.to_string(),
            icon: None,
            color: None,
            duration,
            reminder: None,
        }
    }

    #[tokio::test]
    async fn test_create_habit_handler() {
        let state = setup_test_state().await;

        let response = create_habit(State(state.clone()), Json(create_request("Run", 30)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let list = list_habits(State(state), Query(HabitListQuery { owner_id: 42 }))
            .await
            .into_response();
        assert_eq!(list.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_habit_validation_error() {
        let state = setup_test_state().await;

        let response = create_habit(State(state), Json(create_request("", 30)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_complete_habit_conflict_on_second_call() {
        let state = setup_test_state().await;

        let habit = state
            .habit_service
            .create_habit(CreateHabitCommand {
                owner_id: 42,
                title: "Run".to_string(),
                icon: None,
                color: None,
                duration: 30,
                reminder: None,
            })
            .await
            .unwrap();

        let request = CompleteHabitRequest {
            date: Some("2024-01-01".to_string()),
        };

        let first = complete_habit(State(state.clone()), Path(habit.id), Json(request.clone()))
            .await
            .into_response();
        assert_eq!(first.status(), StatusCode::OK);

        let second = complete_habit(State(state), Path(habit.id), Json(request))
            .await
            .into_response();
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_complete_habit_rejects_malformed_date() {
        let state = setup_test_state().await;

        let response = complete_habit(
            State(state),
            Path(1),
            Json(CompleteHabitRequest {
                date: Some("01/01/2024".to_string()),
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_habit_is_404() {
        let state = setup_test_state().await;

        let response = toggle_active(State(state), Path(999)).await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_habit_handler() {
        let state = setup_test_state().await;

        let response = delete_habit(State(state), Path(999)).await.into_response();
        // Idempotent delete: missing habit is still a success
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_day_period_handler() {
        let response = get_day_period().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
