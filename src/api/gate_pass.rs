use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::config::Config;
use crate::core::business_day::date_key;
use crate::core::gate_pass::{GateDecision, decide};
use crate::error::ServiceError;
use crate::live::{self, LiveScan};
use crate::model::employee::Employee;
use crate::model::event::{EventAction, LogStatus, SubjectType};
use crate::model::gate_pass::GatePass;

use super::verification::{append_event, last_main_action};

#[derive(Deserialize, ToSchema)]
pub struct GatePassRequest {
    pub employee_id: String,
}

#[derive(Serialize, ToSchema)]
pub struct GatePassResponse {
    pub message: String,
    pub action: EventAction,
    #[schema(nullable = true)]
    pub duration: Option<String>,
}

/// Gate-pass toggle: first presentation opens a departure, the next closes
/// it with a recorded duration. Requires the employee to be clocked in.
#[utoipa::path(
    post,
    path = "/api/gate-pass",
    request_body = GatePassRequest,
    responses(
        (status = 200, description = "Gate movement recorded", body = GatePassResponse),
        (status = 403, description = "Employee is not clocked in"),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Pass was closed concurrently; retry")
    ),
    tag = "GatePass"
)]
pub async fn process_gate_pass(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<GatePassRequest>,
) -> actix_web::Result<impl Responder> {
    let employee_id = payload.employee_id.trim().to_string();

    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(&employee_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| ServiceError::NotFound("Employee".into()))?;

    // Gate passes are only issued to people inside the building.
    let last = last_main_action(&pool, &employee.id).await?;
    if last != Some(EventAction::Login) {
        warn!(employee_id = %employee.id, "Gate pass denied: not clocked in");
        return Err(ServiceError::AccessDenied("Staff must Clock-In first.".into()).into());
    }

    let now = Utc::now().timestamp_millis();

    // Open lookup is not day-scoped: a pass opened before midnight is still
    // the one being closed after it.
    let open_pass = sqlx::query_as::<_, GatePass>(
        "SELECT * FROM gate_passes WHERE employee_id = ? AND time_in IS NULL
         ORDER BY time_out DESC LIMIT 1",
    )
    .bind(&employee.id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(ServiceError::from)?;

    let decision = decide(open_pass.as_ref(), now);
    let (action, duration) = match &decision {
        GateDecision::Depart => {
            sqlx::query(
                "INSERT INTO gate_passes (employee_id, employee_name, time_out, time_in, date)
                 VALUES (?, ?, ?, NULL, ?)",
            )
            .bind(&employee.id)
            .bind(&employee.name)
            .bind(now)
            .bind(date_key(now, config.display_tz))
            .execute(pool.get_ref())
            .await
            .map_err(ServiceError::from)?;

            info!(employee_id = %employee.id, "Gate departure recorded");
            (EventAction::GateOut, None)
        }
        GateDecision::Return { pass_id, duration } => {
            // Conditional close: if another terminal already closed this
            // pass, zero rows match and the caller gets a retryable conflict
            // instead of a silent overwrite.
            let result = sqlx::query(
                "UPDATE gate_passes SET time_in = ?, duration = ?
                 WHERE id = ? AND time_in IS NULL",
            )
            .bind(now)
            .bind(duration)
            .bind(pass_id)
            .execute(pool.get_ref())
            .await
            .map_err(ServiceError::from)?;

            if result.rows_affected() == 0 {
                return Err(
                    ServiceError::Conflict("Gate pass already closed, retry".into()).into(),
                );
            }

            info!(employee_id = %employee.id, %duration, "Gate return recorded");
            (EventAction::GateIn, Some(duration.clone()))
        }
    };

    append_event(
        &pool,
        &employee.id,
        &employee.name,
        now,
        LogStatus::Success,
        action,
        1.0,
        SubjectType::Employee,
        None,
    )
    .await?;

    live::publish(LiveScan {
        subject_id: employee.id.clone(),
        subject_name: employee.name.clone(),
        action,
        timestamp: now,
    })
    .await;

    Ok(HttpResponse::Ok().json(GatePassResponse {
        message: match action {
            EventAction::GateOut => "Departure recorded".to_string(),
            _ => "Return recorded".to_string(),
        },
        action,
        duration,
    }))
}

/// Recent gate passes, newest departure first.
#[utoipa::path(
    get,
    path = "/api/gate-pass",
    responses(
        (status = 200, description = "Gate pass history", body = [GatePass])
    ),
    tag = "GatePass"
)]
pub async fn list_gate_passes(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let passes = sqlx::query_as::<_, GatePass>(
        "SELECT * FROM gate_passes ORDER BY time_out DESC LIMIT ?",
    )
    .bind(config.event_limit)
    .fetch_all(pool.get_ref())
    .await
    .map_err(ServiceError::from)?;

    Ok(HttpResponse::Ok().json(passes))
}
