use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::error::ServiceError;
use crate::model::notice::Notice;

#[derive(Deserialize, ToSchema)]
pub struct NoticePayload {
    pub content: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub icon: Option<String>,
}

fn default_active() -> bool {
    true
}

#[utoipa::path(
    get,
    path = "/api/notices",
    responses((status = 200, description = "Notices, most recently updated first", body = [Notice])),
    tag = "Registry"
)]
pub async fn list_notices(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let notices = sqlx::query_as::<_, Notice>("SELECT * FROM notices ORDER BY updated_at DESC")
        .fetch_all(pool.get_ref())
        .await
        .map_err(ServiceError::from)?;
    Ok(HttpResponse::Ok().json(notices))
}

#[utoipa::path(
    post,
    path = "/api/notices",
    request_body = NoticePayload,
    responses((status = 200, description = "Notice created", body = Notice)),
    tag = "Registry"
)]
pub async fn create_notice(
    pool: web::Data<MySqlPool>,
    payload: web::Json<NoticePayload>,
) -> actix_web::Result<impl Responder> {
    let updated_at = Utc::now().timestamp_millis();

    let result =
        sqlx::query("INSERT INTO notices (content, is_active, updated_at, icon) VALUES (?, ?, ?, ?)")
            .bind(&payload.content)
            .bind(payload.is_active)
            .bind(updated_at)
            .bind(&payload.icon)
            .execute(pool.get_ref())
            .await
            .map_err(ServiceError::from)?;

    Ok(HttpResponse::Ok().json(Notice {
        id: result.last_insert_id(),
        content: payload.content.clone(),
        is_active: payload.is_active,
        updated_at,
        icon: payload.icon.clone(),
    }))
}

#[utoipa::path(
    put,
    path = "/api/notices/{id}",
    params(("id" = u64, Path, description = "Notice ID")),
    request_body = NoticePayload,
    responses(
        (status = 200, description = "Notice updated"),
        (status = 404, description = "Notice not found")
    ),
    tag = "Registry"
)]
pub async fn update_notice(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<NoticePayload>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();

    let result = sqlx::query(
        "UPDATE notices SET content = ?, is_active = ?, icon = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&payload.content)
    .bind(payload.is_active)
    .bind(&payload.icon)
    .bind(Utc::now().timestamp_millis())
    .bind(id)
    .execute(pool.get_ref())
    .await
    .map_err(ServiceError::from)?;

    if result.rows_affected() == 0 {
        return Err(ServiceError::NotFound("Notice".into()).into());
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "Notice updated" })))
}

#[utoipa::path(
    delete,
    path = "/api/notices/{id}",
    params(("id" = u64, Path, description = "Notice ID")),
    responses(
        (status = 200, description = "Notice deleted"),
        (status = 404, description = "Notice not found")
    ),
    tag = "Registry"
)]
pub async fn delete_notice(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();
    let result = sqlx::query("DELETE FROM notices WHERE id = ?")
        .bind(id)
        .execute(pool.get_ref())
        .await
        .map_err(ServiceError::from)?;

    if result.rows_affected() == 0 {
        return Err(ServiceError::NotFound("Notice".into()).into());
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "Notice deleted" })))
}
