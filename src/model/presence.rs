use chrono::{DateTime, Duration, Utc};
use std::str::FromStr;

use crate::model::status::PresenceStatus;
use crate::utils::time::is_stale;

/// Status as reported to readers. Nothing ever expires rows in the store;
/// a stored `online` whose heartbeat went quiet past the threshold is
/// reported as offline without being rewritten.
pub fn effective_status(
    stored: &str,
    last_activity: DateTime<Utc>,
    now: DateTime<Utc>,
    stale_after: Duration,
) -> PresenceStatus {
    match PresenceStatus::from_str(stored) {
        Ok(PresenceStatus::Online) if !is_stale(last_activity, now, stale_after) => {
            PresenceStatus::Online
        }
        _ => PresenceStatus::Offline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn fresh_online_stays_online() {
        let status = effective_status(
            "online",
            now() - Duration::seconds(20),
            now(),
            Duration::seconds(90),
        );
        assert_eq!(status, PresenceStatus::Online);
    }

    #[test]
    fn quiet_online_reads_as_offline() {
        let status = effective_status(
            "online",
            now() - Duration::seconds(300),
            now(),
            Duration::seconds(90),
        );
        assert_eq!(status, PresenceStatus::Offline);
    }

    #[test]
    fn offline_is_offline_regardless_of_activity() {
        let status = effective_status("offline", now(), now(), Duration::seconds(90));
        assert_eq!(status, PresenceStatus::Offline);
    }

    #[test]
    fn unknown_stored_value_defaults_to_offline() {
        let status = effective_status("banana", now(), now(), Duration::seconds(90));
        assert_eq!(status, PresenceStatus::Offline);
    }
}
