use serde::Serialize;
use utoipa::ToSchema;

use crate::model::event::SubjectType;

/// Sentinel `time_out` for a session that has not been closed.
pub const ONSITE: &str = "ONSITE";
/// Sentinel `time_in` for an orphan logout with no matching entry.
pub const NO_ENTRY: &str = "---";

/// Reconstructed entry/exit pairing for one subject on one calendar day.
/// Read model only: rebuilt from the event log on every query, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AttendanceSession {
    pub subject_id: String,
    pub name: String,
    /// Local calendar-day key, `DD/MM/YYYY`.
    #[schema(example = "29/08/2026")]
    pub date: String,
    /// `HH:MM` local time, or `---` for an orphan logout.
    #[schema(example = "08:03")]
    pub time_in: String,
    /// `HH:MM` local time, or `ONSITE` while unresolved.
    #[schema(example = "17:12")]
    pub time_out: String,
    pub department: String,
    pub subject_type: SubjectType,
}
