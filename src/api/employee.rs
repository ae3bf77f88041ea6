use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::model::employee::Employee;
use crate::utils::credential_filter;
use crate::utils::db_utils::{build_update_sql, execute_update};

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "Jane Moyo")]
    pub name: String,
    #[schema(example = "jane@company.com", format = "email", value_type = String)]
    pub email: Option<String>,
    #[schema(example = "Operations")]
    pub department: String,
    #[schema(example = "4821")]
    pub pin: String,
    /// Opaque template from enrollment; empty if biometrics are not enrolled.
    #[serde(default)]
    pub fingerprint_hash: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EmployeeQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub department: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<Employee>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 42)]
    pub total: i64,
}

/// Create Employee. Issues the id and QR payload; registers the new
/// credentials with the kiosk pre-filter.
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 200, description = "Employee created", body = Employee),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    let id = Uuid::new_v4().to_string();
    let qr_code_data = format!(
        "EMP-{}",
        Uuid::new_v4().to_string().replace('-', "")[..9].to_uppercase()
    );
    let created_at = Utc::now().timestamp_millis();

    sqlx::query(
        r#"
        INSERT INTO employees
            (id, name, email, department, pin, fingerprint_hash, qr_code_data, outside_work_until, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, NULL, ?)
        "#,
    )
    .bind(&id)
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(&payload.department)
    .bind(payload.pin.trim())
    .bind(&payload.fingerprint_hash)
    .bind(&qr_code_data)
    .bind(created_at)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to create employee");
        ErrorInternalServerError("Internal Server Error")
    })?;

    credential_filter::insert(payload.pin.trim());
    credential_filter::insert(&qr_code_data);

    Ok(HttpResponse::Ok().json(Employee {
        id,
        name: payload.name.clone(),
        email: payload.email.clone(),
        department: payload.department.clone(),
        pin: payload.pin.trim().to_string(),
        fingerprint_hash: payload.fingerprint_hash.clone(),
        qr_code_data,
        outside_work_until: None,
        created_at,
    }))
}

/// Paginated employee list with department and name/email search filters.
#[utoipa::path(
    get,
    path = "/api/employees",
    params(
        ("page", Query, description = "Page number"),
        ("per_page", Query, description = "Items per page"),
        ("department", Query, description = "Filter by department"),
        ("search", Query, description = "Search by name or email")
    ),
    responses(
        (status = 200, description = "Paginated employee list", body = EmployeeListResponse)
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    pool: web::Data<MySqlPool>,
    query: web::Query<EmployeeQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // ---------- build WHERE clause dynamically ----------
    let mut conditions = Vec::new();
    let mut bindings: Vec<String> = Vec::new();

    if let Some(department) = &query.department {
        conditions.push("department = ?");
        bindings.push(department.clone());
    }

    if let Some(search) = &query.search {
        conditions.push("(name LIKE ? OR email LIKE ?)");
        let like = format!("%{}%", search);
        bindings.push(like.clone());
        bindings.push(like);
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) FROM employees {}", where_clause);
    debug!(sql = %count_sql, bindings = ?bindings, "Counting employees");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = count_query.bind(b);
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count employees");
        ErrorInternalServerError("Database error")
    })?;

    let data_sql = format!(
        "SELECT * FROM employees {} ORDER BY name ASC LIMIT ? OFFSET ?",
        where_clause
    );
    debug!(sql = %data_sql, page, per_page, offset, "Fetching employees");

    let mut data_query = sqlx::query_as::<_, Employee>(&data_sql);
    for b in &bindings {
        data_query = data_query.bind(b);
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let employees = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch employees");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        data: employees,
        page,
        per_page,
        total,
    }))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}",
    params(("employee_id" = String, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(employee_id.trim())
        .fetch_optional(pool.get_ref())
        .await
        .map_err(ServiceError::from)?;

    match employee {
        Some(emp) => Ok(HttpResponse::Ok().json(emp)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        }))),
    }
}

/// Partial update. New PIN/QR values are added to the credential pre-filter;
/// stale entries only ever cause a false positive, which the registry lookup
/// resolves.
#[utoipa::path(
    put,
    path = "/api/employees/{employee_id}",
    params(("employee_id" = String, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee updated"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let update = build_update_sql("employees", &body, "id", employee_id.trim())?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(ServiceError::from)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().body("Employee not found"));
    }

    if let Some(pin) = body.get("pin").and_then(Value::as_str) {
        credential_filter::insert(pin);
    }
    if let Some(qr) = body.get("qr_code_data").and_then(Value::as_str) {
        credential_filter::insert(qr);
    }

    Ok(HttpResponse::Ok().body("Employee updated successfully"))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/employees/{employee_id}",
    params(("employee_id" = String, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let existing = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(employee_id.trim())
        .fetch_optional(pool.get_ref())
        .await
        .map_err(ServiceError::from)?;

    let Some(employee) = existing else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    };

    sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(&employee.id)
        .execute(pool.get_ref())
        .await
        .map_err(ServiceError::from)?;

    credential_filter::remove(&employee.pin);
    credential_filter::remove(&employee.qr_code_data);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}

/// Full registry, name order. Shared by the session and overview read models.
pub async fn fetch_all_employees(pool: &MySqlPool) -> Result<Vec<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>("SELECT * FROM employees ORDER BY name ASC")
        .fetch_all(pool)
        .await
}
