pub mod commands;
pub mod completion_guard;
pub mod day_period;
pub mod habit_service;
pub mod models;

pub use completion_guard::CompletionGuard;
pub use habit_service::HabitService;
