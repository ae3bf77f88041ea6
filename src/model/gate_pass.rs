use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A short departure-and-return record, distinct from main building login
/// state. Open pass = `time_in` null. At most one open pass per employee;
/// the open lookup is deliberately not day-scoped so a pass survives
/// midnight rollover.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct GatePass {
    pub id: u64,
    pub employee_id: String,
    pub employee_name: String,
    pub time_out: i64,
    #[schema(nullable = true)]
    pub time_in: Option<i64>,
    /// Formatted on close, e.g. "1h 23m".
    #[schema(nullable = true)]
    pub duration: Option<String>,
    /// Local calendar-day key of the departure, display metadata only.
    #[schema(example = "29/08/2026")]
    pub date: String,
}
