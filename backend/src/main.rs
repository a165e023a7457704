use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};

use compass_backend::domain::{CompletionGuard, HabitService};
use compass_backend::rest::{self, AppState};
use compass_backend::storage::sqlite::{
    HabitRepository, MarkerRepository, ReminderRepository, SqliteConnection,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Setting up database");
    let connection = SqliteConnection::init().await?;

    let habits = Arc::new(HabitRepository::new(connection.clone()));
    let reminders = Arc::new(ReminderRepository::new(connection.clone()));
    let guard = CompletionGuard::new(Arc::new(MarkerRepository::new(connection)));
    let habit_service = HabitService::new(habits, reminders, guard);

    let state = AppState::new(habit_service);

    // CORS setup to allow the mini-app frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api", rest::routes())
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
