//! Marshaling between epoch-millisecond dates and the `YYYY-MM-DD` / `HH:MM` strings the
//! session forms work with.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::InputError;
use crate::model::Millis;

fn at(ms: Millis, tz: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    DateTime::<Utc>::from_timestamp_millis(ms).map(|utc| utc.with_timezone(tz))
}

/// `YYYY-MM-DD` in `tz`; `None` when `ms` is outside chrono's range.
pub fn date_input(ms: Millis, tz: &FixedOffset) -> Option<String> {
    at(ms, tz).map(|d| d.format("%Y-%m-%d").to_string())
}

/// Zero-padded `HH:MM` in `tz`.
pub fn time_input(ms: Millis, tz: &FixedOffset) -> Option<String> {
    at(ms, tz).map(|d| d.format("%H:%M").to_string())
}

pub fn parse_date(date: &str) -> Result<NaiveDate, InputError> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| InputError::Date(date.to_string()))
}

pub fn parse_time(time: &str) -> Result<NaiveTime, InputError> {
    NaiveTime::parse_from_str(time.trim(), "%H:%M").map_err(|_| InputError::Time(time.to_string()))
}

/// Combines a calendar day and a wall-clock time in `tz` into epoch milliseconds.
pub fn from_inputs(date: &str, time: &str, tz: &FixedOffset) -> Result<Millis, InputError> {
    let naive = NaiveDateTime::new(parse_date(date)?, parse_time(time)?);
    tz.from_local_datetime(&naive)
        .single()
        .map(|d| d.timestamp_millis())
        .ok_or_else(|| InputError::Unrepresentable { date: date.to_string(), time: time.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn formats_with_zero_padding() {
        // 2017-03-04T05:07:00Z
        let ms = 1_488_604_020_000;
        assert_eq!(date_input(ms, &utc()).as_deref(), Some("2017-03-04"));
        assert_eq!(time_input(ms, &utc()).as_deref(), Some("05:07"));
    }

    #[test]
    fn offset_can_move_the_calendar_day() {
        let ms = 1_488_604_020_000;
        let west = FixedOffset::west_opt(6 * 3600).unwrap();
        assert_eq!(date_input(ms, &west).as_deref(), Some("2017-03-03"));
        assert_eq!(time_input(ms, &west).as_deref(), Some("23:07"));
    }

    #[test]
    fn inputs_convert_back_to_the_same_instant() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let ms = from_inputs("2017-03-04", "07:07", &tz).unwrap();
        assert_eq!(ms, 1_488_604_020_000);
        assert_eq!(time_input(ms, &tz).as_deref(), Some("07:07"));
    }

    #[rstest]
    #[case("2017-13-01", "10:00")]
    #[case("04/03/2017", "10:00")]
    #[case("", "10:00")]
    fn bad_dates_are_rejected(#[case] date: &str, #[case] time: &str) {
        assert_eq!(from_inputs(date, time, &utc()), Err(InputError::Date(date.to_string())));
    }

    #[rstest]
    #[case("25:00")]
    #[case("10-30")]
    #[case("noon")]
    fn bad_times_are_rejected(#[case] time: &str) {
        assert_eq!(from_inputs("2017-03-04", time, &utc()), Err(InputError::Time(time.to_string())));
    }
}
