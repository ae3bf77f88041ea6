use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Operator-tunable clock settings. All values are `HH:MM` strings; the
/// classifier parses the hour out of `day_start`/`day_end` and falls back to
/// defaults if an operator saved something unparseable.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct SystemSettings {
    #[schema(example = "09:00")]
    pub late_threshold: String,
    #[schema(example = "08:00")]
    pub early_threshold: String,
    #[schema(example = "06:00")]
    pub day_start: String,
    #[schema(example = "18:00")]
    pub day_end: String,
    #[schema(example = "07:00")]
    pub outside_login: String,
    #[schema(example = "17:00")]
    pub outside_logout: String,
    pub company_motto: String,
    pub company_contact: String,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            late_threshold: "09:00".to_string(),
            early_threshold: "08:00".to_string(),
            day_start: "06:00".to_string(),
            day_end: "18:00".to_string(),
            outside_login: "07:00".to_string(),
            outside_logout: "17:00".to_string(),
            company_motto: "Excellence".to_string(),
            company_contact: "Support".to_string(),
        }
    }
}
