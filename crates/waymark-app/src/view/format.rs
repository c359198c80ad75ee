#![forbid(unsafe_code)]

//! Date, duration, and price formatting shared by the views.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// Day marker for a row, e.g. `AUG 25`.
#[must_use]
pub fn day(at: DateTime<Utc>) -> String {
    at.format("%b %d").to_string().to_uppercase()
}

/// Clock time, e.g. `14:30`.
#[must_use]
pub fn time(at: DateTime<Utc>) -> String {
    at.format("%H:%M").to_string()
}

/// Editable date-and-time text, e.g. `25/08/26 14:30`.
#[must_use]
pub fn datetime(at: DateTime<Utc>) -> String {
    at.format("%d/%m/%y %H:%M").to_string()
}

/// Parse text produced by [`datetime`] back into a timestamp.
#[must_use]
pub fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(text.trim(), "%d/%m/%y %H:%M")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Elapsed time between two points of a waypoint.
///
/// Under an hour shows minutes only, under a day hours and minutes,
/// otherwise days too: `23M`, `02H 44M`, `01D 02H 30M`.
#[must_use]
pub fn duration(elapsed: Duration) -> String {
    let minutes = elapsed.num_minutes().max(0);
    let (days, hours, minutes) = (minutes / (24 * 60), minutes / 60 % 24, minutes % 60);
    if days > 0 {
        format!("{days:02}D {hours:02}H {minutes:02}M")
    } else if hours > 0 {
        format!("{hours:02}H {minutes:02}M")
    } else {
        format!("{minutes:02}M")
    }
}

/// Price tag, e.g. `€160`.
#[must_use]
pub fn euros(amount: u32) -> String {
    format!("€{amount}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).single().unwrap()
    }

    #[test]
    fn day_is_uppercased_month_and_date() {
        assert_eq!(day(at(2026, 8, 25, 12, 0)), "AUG 25");
        assert_eq!(day(at(2026, 3, 1, 0, 0)), "MAR 01");
    }

    #[test]
    fn datetime_round_trips() {
        let point = at(2026, 8, 25, 14, 30);
        assert_eq!(datetime(point), "25/08/26 14:30");
        assert_eq!(parse_datetime("25/08/26 14:30"), Some(point));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_datetime("tomorrow"), None);
        assert_eq!(parse_datetime("32/01/26 10:00"), None);
        assert_eq!(parse_datetime(""), None);
    }

    #[test]
    fn duration_picks_the_right_granularity() {
        assert_eq!(duration(Duration::minutes(23)), "23M");
        assert_eq!(duration(Duration::minutes(2 * 60 + 44)), "02H 44M");
        assert_eq!(
            duration(Duration::minutes(26 * 60 + 30)),
            "01D 02H 30M"
        );
        assert_eq!(duration(Duration::zero()), "00M");
    }

    #[test]
    fn negative_durations_clamp_to_zero() {
        assert_eq!(duration(Duration::minutes(-5)), "00M");
    }

    #[test]
    fn euros_prefixes_the_amount() {
        assert_eq!(euros(0), "€0");
        assert_eq!(euros(1100), "€1100");
    }

    proptest! {
        // Two-digit years only round-trip inside the 2000..=2068 pivot
        // window, so the timestamps stay within it.
        #[test]
        fn datetime_round_trips_at_minute_precision(secs in 946_684_800i64..3_100_000_000) {
            let truncated = secs - secs % 60;
            let point = DateTime::<Utc>::from_timestamp(truncated, 0).unwrap();
            prop_assert_eq!(parse_datetime(&datetime(point)), Some(point));
        }
    }
}
