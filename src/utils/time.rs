use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::error::ApiError;

/// Calendar-day policy: sessions are grouped by the UTC date of the instant.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Worked duration in hours, rounded to 2 decimal places.
///
/// Rejects a check-out earlier than the check-in instead of storing a
/// negative duration.
pub fn worked_hours(
    clock_in: DateTime<Utc>,
    clock_out: DateTime<Utc>,
) -> Result<f64, ApiError> {
    if clock_out < clock_in {
        return Err(ApiError::InvalidTimeRange(
            "Check-out time is earlier than check-in time".to_string(),
        ));
    }

    let ms = (clock_out - clock_in).num_milliseconds() as f64;
    Ok((ms / 3_600_000.0 * 100.0).round() / 100.0)
}

/// True when a liveness timestamp is older than the staleness threshold.
pub fn is_stale(last_activity: DateTime<Utc>, now: DateTime<Utc>, stale_after: Duration) -> bool {
    now.signed_duration_since(last_activity) > stale_after
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn full_day_shift() {
        let hours = worked_hours(ts("2024-01-01T09:00:00Z"), ts("2024-01-01T17:30:00Z")).unwrap();
        assert_eq!(hours, 8.5);
    }

    #[test]
    fn rounds_to_two_decimals() {
        // 1h 23m 45s = 1.3958... -> 1.40
        let hours = worked_hours(ts("2024-01-01T09:00:00Z"), ts("2024-01-01T10:23:45Z")).unwrap();
        assert_eq!(hours, 1.4);

        // one minute -> 0.02
        let hours = worked_hours(ts("2024-01-01T09:00:00Z"), ts("2024-01-01T09:01:00Z")).unwrap();
        assert_eq!(hours, 0.02);
    }

    #[test]
    fn zero_duration_is_allowed() {
        let t = ts("2024-01-01T09:00:00Z");
        assert_eq!(worked_hours(t, t).unwrap(), 0.0);
    }

    #[test]
    fn rejects_clock_skew() {
        let err = worked_hours(ts("2024-01-01T10:00:00Z"), ts("2024-01-01T09:59:59Z"));
        assert!(matches!(err, Err(ApiError::InvalidTimeRange(_))));
    }

    #[test]
    fn staleness_threshold() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let fresh = now - Duration::seconds(30);
        let stale = now - Duration::seconds(120);

        assert!(!is_stale(fresh, now, Duration::seconds(90)));
        assert!(is_stale(stale, now, Duration::seconds(90)));
        // exactly at the threshold still counts as alive
        assert!(!is_stale(now - Duration::seconds(90), now, Duration::seconds(90)));
    }
}
