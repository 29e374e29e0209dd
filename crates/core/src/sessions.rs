use std::cmp::Ordering;

use crate::model::Session;

/// Earliest first. `sort_by` is stable, so sessions sharing a date keep their order.
pub fn sort_sessions_by_date(sessions: &mut [Session]) {
    sessions.sort_by(|a, b| {
        if a.date > b.date {
            Ordering::Greater
        } else if b.date > a.date {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    });
}
