pub mod sqlite;
pub mod traits;

pub use traits::{HabitStorage, MarkerStorage, ReminderStorage};
