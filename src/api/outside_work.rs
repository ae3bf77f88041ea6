use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::info;
use utoipa::ToSchema;

use crate::error::ServiceError;

const DAY_MS: i64 = 86_400_000;

#[derive(Deserialize, ToSchema)]
pub struct Assignment {
    pub employee_id: String,
    pub days: u32,
}

#[derive(Deserialize, ToSchema)]
pub struct AssignRequest {
    pub assignments: Vec<Assignment>,
}

#[derive(Deserialize, ToSchema)]
pub struct ExtendRequest {
    pub days: u32,
}

/// Assign field duty to a batch of employees, each with its own day count.
/// Applied in one transaction: all succeed or none do. Field duty stays
/// derived from `outside_work_until`; no synthetic attendance events are
/// written.
#[utoipa::path(
    post,
    path = "/api/outside-work/assign",
    request_body = AssignRequest,
    responses(
        (status = 200, description = "Assignments applied", body = Object),
        (status = 404, description = "An employee in the batch does not exist")
    ),
    tag = "OutsideWork"
)]
pub async fn assign(
    pool: web::Data<MySqlPool>,
    payload: web::Json<AssignRequest>,
) -> actix_web::Result<impl Responder> {
    if payload.assignments.is_empty() {
        return Err(actix_web::error::ErrorBadRequest("No assignments provided"));
    }

    let now = Utc::now().timestamp_millis();
    let mut tx = pool.begin().await.map_err(ServiceError::from)?;

    for assignment in &payload.assignments {
        let until = now + assignment.days as i64 * DAY_MS;
        let result = sqlx::query("UPDATE employees SET outside_work_until = ? WHERE id = ?")
            .bind(until)
            .bind(assignment.employee_id.trim())
            .execute(&mut *tx)
            .await
            .map_err(ServiceError::from)?;

        if result.rows_affected() == 0 {
            // Unknown employee fails the whole batch.
            tx.rollback().await.map_err(ServiceError::from)?;
            return Err(ServiceError::NotFound(format!(
                "Employee {}",
                assignment.employee_id.trim()
            ))
            .into());
        }
    }

    tx.commit().await.map_err(ServiceError::from)?;

    info!(count = payload.assignments.len(), "Outside work assigned");
    Ok(HttpResponse::Ok().json(json!({
        "message": format!("{} employees assigned to outside work", payload.assignments.len())
    })))
}

/// Recall an employee from field duty immediately.
#[utoipa::path(
    post,
    path = "/api/outside-work/recall/{employee_id}",
    params(("employee_id" = String, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Recalled", body = Object),
        (status = 404, description = "Employee not found")
    ),
    tag = "OutsideWork"
)]
pub async fn recall(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let result = sqlx::query("UPDATE employees SET outside_work_until = NULL WHERE id = ?")
        .bind(employee_id.trim())
        .execute(pool.get_ref())
        .await
        .map_err(ServiceError::from)?;

    if result.rows_affected() == 0 {
        return Err(ServiceError::NotFound("Employee".into()).into());
    }

    info!(employee_id = %employee_id.trim(), "Recalled from outside work");
    Ok(HttpResponse::Ok().json(json!({ "message": "Employee recalled" })))
}

/// Extend a field-duty assignment. Additive from the current expiry, or from
/// now if the assignment already lapsed, never just `now + days`.
#[utoipa::path(
    post,
    path = "/api/outside-work/extend/{employee_id}",
    params(("employee_id" = String, Path, description = "Employee ID")),
    request_body = ExtendRequest,
    responses(
        (status = 200, description = "Extended", body = Object),
        (status = 404, description = "Employee not found")
    ),
    tag = "OutsideWork"
)]
pub async fn extend(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
    payload: web::Json<ExtendRequest>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    let now = Utc::now().timestamp_millis();

    let current = sqlx::query_scalar::<_, Option<i64>>(
        "SELECT outside_work_until FROM employees WHERE id = ?",
    )
    .bind(employee_id.trim())
    .fetch_optional(pool.get_ref())
    .await
    .map_err(ServiceError::from)?
    .ok_or_else(|| ServiceError::NotFound("Employee".into()))?;

    let base = current.filter(|&until| until > now).unwrap_or(now);
    let new_until = base + payload.days as i64 * DAY_MS;

    sqlx::query("UPDATE employees SET outside_work_until = ? WHERE id = ?")
        .bind(new_until)
        .bind(employee_id.trim())
        .execute(pool.get_ref())
        .await
        .map_err(ServiceError::from)?;

    info!(employee_id = %employee_id.trim(), new_until, "Outside work extended");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Outside work extended",
        "outside_work_until": new_until
    })))
}
