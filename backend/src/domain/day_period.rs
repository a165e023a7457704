//! Time-of-day bucketing for the decorative backgrounds.
//!
//! Fixed local-hour boundaries: morning [5, 11), day [11, 17),
//! evening [17, 21), night otherwise. Pure function of the hour; the client
//! polls on a fixed interval to pick background art. No persistence and no
//! error states.

use chrono::{Local, Timelike};
use shared::DayPeriod;

pub fn period_for_hour(hour: u32) -> DayPeriod {
    match hour {
        5..=10 => DayPeriod::Morning,
        11..=16 => DayPeriod::Day,
        17..=20 => DayPeriod::Evening,
        _ => DayPeriod::Night,
    }
}

/// Current bucket from the local wall clock.
pub fn current_period() -> (DayPeriod, u32) {
    let hour = Local::now().hour();
    (period_for_hour(hour), hour)
}
