use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::error::ServiceError;
use crate::model::department::Department;

#[derive(Deserialize, ToSchema)]
pub struct DepartmentPayload {
    pub name: String,
}

#[utoipa::path(
    get,
    path = "/api/departments",
    responses((status = 200, description = "All departments", body = [Department])),
    tag = "Registry"
)]
pub async fn list_departments(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let departments =
        sqlx::query_as::<_, Department>("SELECT * FROM departments ORDER BY name ASC")
            .fetch_all(pool.get_ref())
            .await
            .map_err(ServiceError::from)?;
    Ok(HttpResponse::Ok().json(departments))
}

#[utoipa::path(
    post,
    path = "/api/departments",
    request_body = DepartmentPayload,
    responses((status = 200, description = "Department created", body = Department)),
    tag = "Registry"
)]
pub async fn create_department(
    pool: web::Data<MySqlPool>,
    payload: web::Json<DepartmentPayload>,
) -> actix_web::Result<impl Responder> {
    let result = sqlx::query("INSERT INTO departments (name) VALUES (?)")
        .bind(&payload.name)
        .execute(pool.get_ref())
        .await
        .map_err(ServiceError::from)?;

    Ok(HttpResponse::Ok().json(Department {
        id: result.last_insert_id(),
        name: payload.name.clone(),
    }))
}

#[utoipa::path(
    put,
    path = "/api/departments/{id}",
    params(("id" = u64, Path, description = "Department ID")),
    request_body = DepartmentPayload,
    responses(
        (status = 200, description = "Department renamed"),
        (status = 404, description = "Department not found")
    ),
    tag = "Registry"
)]
pub async fn update_department(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<DepartmentPayload>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();
    let result = sqlx::query("UPDATE departments SET name = ? WHERE id = ?")
        .bind(&payload.name)
        .bind(id)
        .execute(pool.get_ref())
        .await
        .map_err(ServiceError::from)?;

    if result.rows_affected() == 0 {
        return Err(ServiceError::NotFound("Department".into()).into());
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "Department updated" })))
}

#[utoipa::path(
    delete,
    path = "/api/departments/{id}",
    params(("id" = u64, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department deleted"),
        (status = 404, description = "Department not found")
    ),
    tag = "Registry"
)]
pub async fn delete_department(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();
    let result = sqlx::query("DELETE FROM departments WHERE id = ?")
        .bind(id)
        .execute(pool.get_ref())
        .await
        .map_err(ServiceError::from)?;

    if result.rows_affected() == 0 {
        return Err(ServiceError::NotFound("Department".into()).into());
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "Department deleted" })))
}
