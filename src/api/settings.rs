use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use sqlx::MySqlPool;

use crate::error::ServiceError;
use crate::model::settings::SystemSettings;

/// Settings live in a single row; absence means factory defaults.
const SETTINGS_ROW_ID: i32 = 1;

pub async fn load_settings(pool: &MySqlPool) -> Result<SystemSettings, sqlx::Error> {
    let stored = sqlx::query_as::<_, SystemSettings>(
        r#"
        SELECT late_threshold, early_threshold, day_start, day_end,
               outside_login, outside_logout, company_motto, company_contact
        FROM settings WHERE id = ?
        "#,
    )
    .bind(SETTINGS_ROW_ID)
    .fetch_optional(pool)
    .await?;

    Ok(stored.unwrap_or_default())
}

#[utoipa::path(
    get,
    path = "/api/settings",
    responses((status = 200, description = "Current settings (defaults if never saved)", body = SystemSettings)),
    tag = "Registry"
)]
pub async fn get_settings(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let settings = load_settings(pool.get_ref())
        .await
        .map_err(ServiceError::from)?;
    Ok(HttpResponse::Ok().json(settings))
}

#[utoipa::path(
    put,
    path = "/api/settings",
    request_body = SystemSettings,
    responses((status = 200, description = "Settings saved")),
    tag = "Registry"
)]
pub async fn update_settings(
    pool: web::Data<MySqlPool>,
    payload: web::Json<SystemSettings>,
) -> actix_web::Result<impl Responder> {
    sqlx::query(
        r#"
        INSERT INTO settings
            (id, late_threshold, early_threshold, day_start, day_end,
             outside_login, outside_logout, company_motto, company_contact)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE
            late_threshold = VALUES(late_threshold),
            early_threshold = VALUES(early_threshold),
            day_start = VALUES(day_start),
            day_end = VALUES(day_end),
            outside_login = VALUES(outside_login),
            outside_logout = VALUES(outside_logout),
            company_motto = VALUES(company_motto),
            company_contact = VALUES(company_contact)
        "#,
    )
    .bind(SETTINGS_ROW_ID)
    .bind(&payload.late_threshold)
    .bind(&payload.early_threshold)
    .bind(&payload.day_start)
    .bind(&payload.day_end)
    .bind(&payload.outside_login)
    .bind(&payload.outside_logout)
    .bind(&payload.company_motto)
    .bind(&payload.company_contact)
    .execute(pool.get_ref())
    .await
    .map_err(ServiceError::from)?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Settings saved" })))
}
