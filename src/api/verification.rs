use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::bridge::FingerprintBridge;
use crate::config::Config;
use crate::core::business_day::{day_id, time_hm};
use crate::core::toggle;
use crate::error::ServiceError;
use crate::live::{self, LiveScan};
use crate::model::employee::Employee;
use crate::model::event::{ArrivalCategory, EventAction, LogStatus, SubjectType};
use crate::utils::{credential_filter, debounce};

use super::settings::load_settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthMode {
    Pin,
    Qr,
    Fingerprint,
}

#[derive(Deserialize, ToSchema)]
pub struct VerifyRequest {
    pub mode: AuthMode,
    /// PIN digits, QR payload, or a pre-captured template. For FINGERPRINT
    /// mode without a credential the bridge is asked to scan.
    pub credential: Option<String>,
    /// Explicit action override; omitted means toggle from the last one.
    pub action: Option<EventAction>,
    pub confidence: Option<f64>,
}

#[derive(Serialize, ToSchema)]
pub struct VerifyResponse {
    pub message: String,
    pub action: EventAction,
    pub subject_id: String,
    pub subject_name: String,
    pub department: String,
    #[schema(nullable = true)]
    pub category: Option<ArrivalCategory>,
}

#[derive(Deserialize, ToSchema)]
pub struct VisitorRequest {
    /// Omitted on first login; the terminal issues a visitor id.
    pub visitor_id: Option<String>,
    pub name: String,
    pub action: Option<EventAction>,
}

/// Staff verification: credential → registry → toggle → event append.
#[utoipa::path(
    post,
    path = "/api/attendance/verify",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Verification accepted", body = VerifyResponse),
        (status = 403, description = "Credential not recognized"),
        (status = 409, description = "Duplicate scan inside the debounce window"),
        (status = 503, description = "Biometric hardware unavailable")
    ),
    tag = "Attendance"
)]
pub async fn verify(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    bridge: web::Data<FingerprintBridge>,
    payload: web::Json<VerifyRequest>,
) -> actix_web::Result<impl Responder> {
    let now = Utc::now().timestamp_millis();

    let employee = match resolve_employee(&pool, &bridge, &payload).await? {
        Some(emp) => emp,
        None => {
            record_failed_attempt(&pool, now).await?;
            return Err(ServiceError::AccessDenied("Incorrect Identity Key".into()).into());
        }
    };

    if debounce::is_duplicate(&employee.id, now, config.debounce_ms()).await {
        return Err(ServiceError::Conflict("Duplicate scan ignored".into()).into());
    }

    let action = match payload.action {
        Some(action) if action.is_main_ledger() => action,
        Some(_) => {
            return Err(actix_web::error::ErrorBadRequest(
                "Gate actions go through the gate-pass endpoint",
            ));
        }
        None => toggle::next_action(last_main_action(&pool, &employee.id).await?),
    };

    let category = if action == EventAction::Login {
        let settings = load_settings(&pool).await.map_err(ServiceError::from)?;
        Some(arrival_category(
            &time_hm(now, config.display_tz),
            &settings.early_threshold,
            &settings.late_threshold,
        ))
    } else {
        None
    };

    let confidence = payload.confidence.unwrap_or(1.0).clamp(0.0, 1.0);
    append_event(
        &pool,
        &employee.id,
        &employee.name,
        now,
        LogStatus::Success,
        action,
        confidence,
        SubjectType::Employee,
        category,
    )
    .await?;

    bump_present_counter(&pool, &config, now, action).await?;
    debounce::record(&employee.id, now).await;
    live::publish(LiveScan {
        subject_id: employee.id.clone(),
        subject_name: employee.name.clone(),
        action,
        timestamp: now,
    })
    .await;

    info!(subject_id = %employee.id, %action, "Verification recorded");

    Ok(HttpResponse::Ok().json(VerifyResponse {
        message: format!("{} recorded", action),
        action,
        subject_id: employee.id,
        subject_name: employee.name,
        department: employee.department,
        category,
    }))
}

/// Visitor login/logout. Visitors share the event log, tagged VISITOR, and
/// toggle within their own stream.
#[utoipa::path(
    post,
    path = "/api/attendance/visitor",
    request_body = VisitorRequest,
    responses(
        (status = 200, description = "Visitor movement recorded", body = Object)
    ),
    tag = "Attendance"
)]
pub async fn visitor(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<VisitorRequest>,
) -> actix_web::Result<impl Responder> {
    let now = Utc::now().timestamp_millis();
    let visitor_id = payload
        .visitor_id
        .clone()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("visitor-{}", Uuid::new_v4()));

    if debounce::is_duplicate(&visitor_id, now, config.debounce_ms()).await {
        return Err(ServiceError::Conflict("Duplicate scan ignored".into()).into());
    }

    let action = match payload.action {
        Some(action) if action.is_main_ledger() => action,
        Some(_) => {
            return Err(actix_web::error::ErrorBadRequest(
                "Visitors cannot hold gate passes",
            ));
        }
        None => toggle::next_action(last_visitor_action(&pool, &visitor_id).await?),
    };

    append_event(
        &pool,
        &visitor_id,
        &payload.name,
        now,
        LogStatus::Success,
        action,
        1.0,
        SubjectType::Visitor,
        None,
    )
    .await?;

    debounce::record(&visitor_id, now).await;
    live::publish(LiveScan {
        subject_id: visitor_id.clone(),
        subject_name: payload.name.clone(),
        action,
        timestamp: now,
    })
    .await;

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("{} recorded", action),
        "visitor_id": visitor_id,
        "action": action
    })))
}

/// Latest successful scan, if it is fresher than the staleness cutoff.
#[utoipa::path(
    get,
    path = "/api/live/latest",
    responses(
        (status = 200, description = "Fresh scan available", body = Object),
        (status = 204, description = "No fresh scan")
    ),
    tag = "Attendance"
)]
pub async fn live_latest() -> impl Responder {
    match live::latest().await {
        Some(scan) => HttpResponse::Ok().json(scan),
        None => HttpResponse::NoContent().finish(),
    }
}

async fn resolve_employee(
    pool: &MySqlPool,
    bridge: &FingerprintBridge,
    payload: &VerifyRequest,
) -> Result<Option<Employee>, actix_web::Error> {
    match payload.mode {
        AuthMode::Fingerprint => {
            let template = match &payload.credential {
                Some(t) => t.clone(),
                None => bridge.capture_template().await?,
            };
            let emp = sqlx::query_as::<_, Employee>(
                "SELECT * FROM employees WHERE fingerprint_hash = ? LIMIT 1",
            )
            .bind(&template)
            .fetch_optional(pool)
            .await
            .map_err(ServiceError::from)?;
            Ok(emp)
        }
        AuthMode::Pin | AuthMode::Qr => {
            let credential = payload
                .credential
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .ok_or_else(|| actix_web::error::ErrorBadRequest("Missing credential"))?;

            // A filter miss is a guaranteed unknown credential.
            if !credential_filter::might_exist(credential) {
                return Ok(None);
            }

            let column = match payload.mode {
                AuthMode::Pin => "pin",
                _ => "qr_code_data",
            };
            let sql = format!("SELECT * FROM employees WHERE {column} = ? LIMIT 1");
            let emp = sqlx::query_as::<_, Employee>(&sql)
                .bind(credential)
                .fetch_optional(pool)
                .await
                .map_err(ServiceError::from)?;
            Ok(emp)
        }
    }
}

/// Most recent SUCCESS LOGIN/LOGOUT for an employee. The `id DESC` tiebreak
/// keeps equal timestamps in arrival order.
pub async fn last_main_action(
    pool: &MySqlPool,
    subject_id: &str,
) -> Result<Option<EventAction>, ServiceError> {
    let action = sqlx::query_scalar::<_, EventAction>(
        r#"
        SELECT action FROM attendance_events
        WHERE subject_id = ?
          AND status = 'SUCCESS'
          AND action IN ('LOGIN', 'LOGOUT')
          AND subject_type = 'EMPLOYEE'
        ORDER BY ts_ms DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(subject_id.trim())
    .fetch_optional(pool)
    .await?;
    Ok(action)
}

async fn last_visitor_action(
    pool: &MySqlPool,
    subject_id: &str,
) -> Result<Option<EventAction>, ServiceError> {
    let action = sqlx::query_scalar::<_, EventAction>(
        r#"
        SELECT action FROM attendance_events
        WHERE subject_id = ?
          AND status = 'SUCCESS'
          AND action IN ('LOGIN', 'LOGOUT')
          AND subject_type = 'VISITOR'
        ORDER BY ts_ms DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(subject_id.trim())
    .fetch_optional(pool)
    .await?;
    Ok(action)
}

#[allow(clippy::too_many_arguments)]
pub async fn append_event(
    pool: &MySqlPool,
    subject_id: &str,
    subject_name: &str,
    ts_ms: i64,
    status: LogStatus,
    action: EventAction,
    confidence: f64,
    subject_type: SubjectType,
    category: Option<ArrivalCategory>,
) -> Result<(), ServiceError> {
    sqlx::query(
        r#"
        INSERT INTO attendance_events
            (subject_id, subject_name, ts_ms, status, action, confidence, subject_type, category, is_outside_work)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, FALSE)
        "#,
    )
    .bind(subject_id.trim())
    .bind(subject_name)
    .bind(ts_ms)
    .bind(status)
    .bind(action)
    .bind(confidence)
    .bind(subject_type)
    .bind(category)
    .execute(pool)
    .await?;
    Ok(())
}

async fn record_failed_attempt(pool: &MySqlPool, now: i64) -> Result<(), ServiceError> {
    warn!("Verification failed: credential not in registry");
    append_event(
        pool,
        "unknown",
        "Unknown Credential",
        now,
        LogStatus::Failed,
        EventAction::Login,
        0.0,
        SubjectType::Employee,
        None,
    )
    .await
}

/// Atomic increment/decrement on the cached present count for the business
/// day. Advisory only; the classifier remains the source of truth.
async fn bump_present_counter(
    pool: &MySqlPool,
    config: &Config,
    now: i64,
    action: EventAction,
) -> Result<(), ServiceError> {
    let day = day_id(now, config.display_tz, config.rollover_hour);
    match action {
        EventAction::Login => {
            sqlx::query(
                "INSERT INTO present_counters (day_id, count) VALUES (?, 1)
                 ON DUPLICATE KEY UPDATE count = count + 1",
            )
            .bind(&day)
            .execute(pool)
            .await?;
        }
        EventAction::Logout => {
            sqlx::query(
                "UPDATE present_counters SET count = GREATEST(count - 1, 0) WHERE day_id = ?",
            )
            .bind(&day)
            .execute(pool)
            .await?;
        }
        _ => {}
    }
    Ok(())
}

fn arrival_category(hm: &str, early_threshold: &str, late_threshold: &str) -> ArrivalCategory {
    // Zero-padded HH:MM strings compare correctly lexicographically.
    if hm < early_threshold {
        ArrivalCategory::Early
    } else if hm > late_threshold {
        ArrivalCategory::Late
    } else {
        ArrivalCategory::OnTime
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrival_category_uses_thresholds() {
        assert_eq!(arrival_category("07:15", "08:00", "09:00"), ArrivalCategory::Early);
        assert_eq!(arrival_category("08:30", "08:00", "09:00"), ArrivalCategory::OnTime);
        assert_eq!(arrival_category("09:01", "08:00", "09:00"), ArrivalCategory::Late);
        // Boundary values are on time, not early/late.
        assert_eq!(arrival_category("08:00", "08:00", "09:00"), ArrivalCategory::OnTime);
        assert_eq!(arrival_category("09:00", "08:00", "09:00"), ArrivalCategory::OnTime);
    }
}
