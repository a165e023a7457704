//! COMPASS habit backend: the askeza (habit-streak) lifecycle, its
//! once-per-calendar-day completion guarantee, and the REST surface the
//! Telegram mini-app consumes.

pub mod domain;
pub mod rest;
pub mod storage;
