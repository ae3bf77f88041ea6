use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::core::timestamp::RawTimestamp;

/// Only SUCCESS events participate in sessions and classification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LogStatus {
    Success,
    Failed,
    Pending,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EventAction {
    Login,
    Logout,
    GateOut,
    GateIn,
}

impl EventAction {
    /// Gate movements never count as building entry/exit.
    pub fn is_main_ledger(self) -> bool {
        matches!(self, EventAction::Login | EventAction::Logout)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SubjectType {
    Employee,
    Visitor,
}

/// Punctuality bucket stamped on LOGIN events, relative to the configured
/// early/late thresholds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ArrivalCategory {
    Early,
    Late,
    OnTime,
}

/// One row of the append-only event log. `ts_ms` is always canonical
/// millisecond epoch; normalization happens at the ingestion boundary.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceEvent {
    pub id: u64,
    pub subject_id: String,
    pub subject_name: String,
    pub ts_ms: i64,
    pub status: LogStatus,
    pub action: EventAction,
    pub confidence: f64,
    pub subject_type: SubjectType,
    pub category: Option<ArrivalCategory>,
    pub is_outside_work: bool,
}

/// Ingestion payload for batch imports, where timestamps arrive in whatever
/// encoding the source produced.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RawEvent {
    pub subject_id: String,
    pub subject_name: String,
    #[schema(value_type = Object)]
    pub timestamp: RawTimestamp,
    pub status: LogStatus,
    pub action: EventAction,
    #[serde(default)]
    pub confidence: f64,
    pub subject_type: SubjectType,
    pub category: Option<ArrivalCategory>,
    #[serde(default)]
    pub is_outside_work: bool,
}
