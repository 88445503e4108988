//! Question countdown.

use chrono::Utc;

use crate::protocol::{Room, RoomStatus};

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Whole seconds left until `ends_at`, rounded half-up, never negative.
pub fn seconds_left(ends_at: i64, now: i64) -> u64 {
    let remaining = ends_at - now;
    if remaining <= 0 {
        return 0;
    }
    ((remaining as f64 / 1000.0) + 0.5).floor() as u64
}

/// Seconds to display for a room; zero unless a question is open.
pub fn time_left(room: &Room, now: i64) -> u64 {
    match (room.status == RoomStatus::Question, room.ends_at) {
        (true, Some(ends_at)) => seconds_left(ends_at, now),
        _ => 0,
    }
}
