pub mod habit;
pub mod reminder;
