use actix_web::{HttpResponse, Responder, web};
use sqlx::MySqlPool;
use std::collections::HashMap;
use tracing::info;

use crate::config::Config;
use crate::core::business_day::day_start_ms;
use crate::core::session_builder::build_sessions;
use crate::error::ServiceError;
use crate::core::timestamp::normalize;
use crate::model::event::{AttendanceEvent, EventAction, RawEvent, SubjectType};
use crate::model::session::AttendanceSession;

use super::employee::fetch_all_employees;

/// The session read model: recent events folded into entry/exit pairs.
/// Recomputed from the log on every call, never persisted.
#[utoipa::path(
    get,
    path = "/api/attendance/sessions",
    responses(
        (status = 200, description = "Reconstructed sessions, newest first", body = [AttendanceSession])
    ),
    tag = "Attendance"
)]
pub async fn get_sessions(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let (staff_events, visitor_events, employees) = futures::try_join!(
        recent_events(&pool, SubjectType::Employee, config.event_limit),
        recent_events(&pool, SubjectType::Visitor, config.visitor_event_limit),
        fetch_all_employees(&pool),
    )
    .map_err(ServiceError::from)?;

    let mut events = staff_events;
    events.extend(visitor_events);

    let sessions = build_sessions(&events, &employees, config.display_tz);
    info!(
        events = events.len(),
        sessions = sessions.len(),
        "Session read model rebuilt"
    );
    Ok(HttpResponse::Ok().json(sessions))
}

/// Recent raw staff events, newest first.
#[utoipa::path(
    get,
    path = "/api/attendance/logs",
    responses(
        (status = 200, description = "Raw staff event log", body = [AttendanceEvent])
    ),
    tag = "Attendance"
)]
pub async fn get_logs(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let mut events = recent_events(&pool, SubjectType::Employee, config.event_limit)
        .await
        .map_err(ServiceError::from)?;
    events.sort_by(|a, b| b.ts_ms.cmp(&a.ts_ms).then(b.id.cmp(&a.id)));
    Ok(HttpResponse::Ok().json(events))
}

/// Recent raw visitor events, newest first.
#[utoipa::path(
    get,
    path = "/api/attendance/logs/visitors",
    responses(
        (status = 200, description = "Raw visitor event log", body = [AttendanceEvent])
    ),
    tag = "Attendance"
)]
pub async fn get_visitor_logs(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let mut events = recent_events(&pool, SubjectType::Visitor, config.visitor_event_limit)
        .await
        .map_err(ServiceError::from)?;
    events.sort_by(|a, b| b.ts_ms.cmp(&a.ts_ms).then(b.id.cmp(&a.id)));
    Ok(HttpResponse::Ok().json(events))
}

/// Purge the event log, the visitor stream and all gate passes in one
/// transaction. Partial wipes leave the read models inconsistent, so it is
/// all or nothing.
#[utoipa::path(
    delete,
    path = "/api/attendance/logs",
    responses(
        (status = 200, description = "All logs purged", body = Object)
    ),
    tag = "Attendance"
)]
pub async fn purge_logs(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let mut tx = pool.begin().await.map_err(ServiceError::from)?;

    sqlx::query("DELETE FROM attendance_events")
        .execute(&mut *tx)
        .await
        .map_err(ServiceError::from)?;
    sqlx::query("DELETE FROM gate_passes")
        .execute(&mut *tx)
        .await
        .map_err(ServiceError::from)?;
    sqlx::query("DELETE FROM present_counters")
        .execute(&mut *tx)
        .await
        .map_err(ServiceError::from)?;

    tx.commit().await.map_err(ServiceError::from)?;

    info!("Event log purged");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "All logs purged"
    })))
}

/// Visitors currently inside: today's visitor stream replayed, LOGIN adds,
/// LOGOUT removes.
#[utoipa::path(
    get,
    path = "/api/attendance/active-visitors",
    responses(
        (status = 200, description = "Visitors currently in the building", body = Object)
    ),
    tag = "Attendance"
)]
pub async fn active_visitors(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let now = chrono::Utc::now().timestamp_millis();
    let today = day_start_ms(now, config.display_tz, config.rollover_hour);

    let events = sqlx::query_as::<_, AttendanceEvent>(
        r#"
        SELECT * FROM attendance_events
        WHERE subject_type = 'VISITOR' AND status = 'SUCCESS' AND ts_ms >= ?
        ORDER BY ts_ms ASC, id ASC
        "#,
    )
    .bind(today)
    .fetch_all(pool.get_ref())
    .await
    .map_err(ServiceError::from)?;

    let mut active: HashMap<String, String> = HashMap::new();
    for event in &events {
        let id = event.subject_id.trim().to_string();
        match event.action {
            EventAction::Login => {
                active.insert(id, event.subject_name.clone());
            }
            EventAction::Logout => {
                active.remove(&id);
            }
            _ => {}
        }
    }
    let mut list: Vec<_> = active
        .into_iter()
        .map(|(id, name)| serde_json::json!({ "id": id, "name": name }))
        .collect();
    list.sort_by(|a, b| a["name"].as_str().cmp(&b["name"].as_str()));

    Ok(HttpResponse::Ok().json(list))
}

/// Batch import for externally generated events (hardware push backlogs,
/// kiosk exports). Timestamps arrive in whatever encoding the source used
/// and are normalized once, here; the batch lands in one transaction.
#[utoipa::path(
    post,
    path = "/api/attendance/logs/import",
    request_body = [RawEvent],
    responses(
        (status = 200, description = "Batch imported", body = Object)
    ),
    tag = "Attendance"
)]
pub async fn import_logs(
    pool: web::Data<MySqlPool>,
    payload: web::Json<Vec<RawEvent>>,
) -> actix_web::Result<impl Responder> {
    if payload.is_empty() {
        return Err(actix_web::error::ErrorBadRequest("No events provided"));
    }

    let mut tx = pool.begin().await.map_err(ServiceError::from)?;

    for raw in payload.iter() {
        sqlx::query(
            r#"
            INSERT INTO attendance_events
                (subject_id, subject_name, ts_ms, status, action, confidence, subject_type, category, is_outside_work)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(raw.subject_id.trim())
        .bind(&raw.subject_name)
        .bind(normalize(&raw.timestamp))
        .bind(raw.status)
        .bind(raw.action)
        .bind(raw.confidence.clamp(0.0, 1.0))
        .bind(raw.subject_type)
        .bind(raw.category)
        .bind(raw.is_outside_work)
        .execute(&mut *tx)
        .await
        .map_err(ServiceError::from)?;
    }

    tx.commit().await.map_err(ServiceError::from)?;

    info!(count = payload.len(), "Event batch imported");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("{} events imported", payload.len())
    })))
}

async fn recent_events(
    pool: &MySqlPool,
    subject_type: SubjectType,
    limit: u32,
) -> Result<Vec<AttendanceEvent>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceEvent>(
        r#"
        SELECT * FROM attendance_events
        WHERE subject_type = ?
        ORDER BY ts_ms DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(subject_type)
    .bind(limit)
    .fetch_all(pool)
    .await
}
