pub mod connection;
pub mod habit_repository;
pub mod marker_repository;
pub mod reminder_repository;

pub use connection::SqliteConnection;
pub use habit_repository::HabitRepository;
pub use marker_repository::MarkerRepository;
pub use reminder_repository::ReminderRepository;
