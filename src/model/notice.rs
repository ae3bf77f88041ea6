use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Notice {
    pub id: u64,
    pub content: String,
    pub is_active: bool,
    pub updated_at: i64,
    #[schema(nullable = true)]
    pub icon: Option<String>,
}
