use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": "a1b2c3d4",
        "name": "John Doe",
        "email": "john.doe@company.com",
        "department": "Operations",
        "pin": "4821",
        "fingerprint_hash": "FPT-9f8e7d6c",
        "qr_code_data": "EMP-A1B2C3D4E",
        "outside_work_until": null,
        "created_at": 1756400000000i64
    })
)]
pub struct Employee {
    #[schema(example = "a1b2c3d4")]
    pub id: String,

    #[schema(example = "John Doe")]
    pub name: String,

    #[schema(example = "john.doe@company.com", nullable = true)]
    pub email: Option<String>,

    #[schema(example = "Operations")]
    pub department: String,

    /// Hardware credential entered at the kiosk keypad.
    #[schema(example = "4821")]
    pub pin: String,

    /// Opaque template key returned by the biometric bridge. Matched by
    /// equality only, never interpreted.
    pub fingerprint_hash: String,

    #[schema(example = "EMP-A1B2C3D4E")]
    pub qr_code_data: String,

    /// Millisecond epoch until which the employee counts as field duty.
    /// Null or in the past means not on outside work.
    #[schema(nullable = true)]
    pub outside_work_until: Option<i64>,

    pub created_at: i64,
}

impl Employee {
    pub fn on_field_duty(&self, now_ms: i64) -> bool {
        self.outside_work_until.is_some_and(|until| until > now_ms)
    }
}
