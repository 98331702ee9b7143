use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Where an employee works from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WorkMode {
    Remote,
    Onsite,
    Hybrid,
}

/// Attendance-derived employee state: connected between check-in and
/// check-out, disconnected otherwise.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EmployeeStatus {
    Connected,
    Disconnected,
}

/// Lifecycle of a time record. Completed is terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecordStatus {
    Active,
    Completed,
}

/// Liveness signal, independent of attendance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    Offline,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn enums_round_trip_through_their_column_values() {
        assert_eq!(WorkMode::Remote.to_string(), "remote");
        assert_eq!(WorkMode::from_str("hybrid").unwrap(), WorkMode::Hybrid);

        assert_eq!(EmployeeStatus::Connected.to_string(), "connected");
        assert_eq!(
            EmployeeStatus::from_str("disconnected").unwrap(),
            EmployeeStatus::Disconnected
        );

        assert_eq!(RecordStatus::Active.to_string(), "active");
        assert_eq!(RecordStatus::Completed.to_string(), "completed");

        assert_eq!(PresenceStatus::Online.to_string(), "online");
        assert!(PresenceStatus::from_str("away").is_err());
    }
}
