use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde::Serialize;
use sqlx::MySqlPool;
use tracing::info;
use utoipa::ToSchema;

use crate::config::Config;
use crate::core::business_day::{day_id, day_start_ms};
use crate::core::classifier::{HourBucket, classify, hourly_histogram};
use crate::error::ServiceError;
use crate::model::event::AttendanceEvent;

use super::employee::fetch_all_employees;
use super::settings::load_settings;

#[derive(Serialize, ToSchema)]
pub struct OverviewResponse {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub field_duty: usize,
    pub present_pct: f64,
    pub absent_pct: f64,
    pub field_duty_pct: f64,
    pub present_ids: Vec<String>,
    pub absent_ids: Vec<String>,
    pub field_duty_ids: Vec<String>,
    pub histogram: Vec<HourBucket>,
    /// Cached running counter for the business day; advisory only.
    pub counter: i64,
}

/// Dashboard roll call: the registry partitioned into present / field duty /
/// absent for the current business day, plus the hourly clock-in histogram.
#[utoipa::path(
    get,
    path = "/api/overview",
    responses(
        (status = 200, description = "Roll call and histogram", body = OverviewResponse)
    ),
    tag = "Overview"
)]
pub async fn get_overview(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let now = Utc::now().timestamp_millis();
    let today_start = day_start_ms(now, config.display_tz, config.rollover_hour);

    let (employees, events, settings) = futures::try_join!(
        fetch_all_employees(&pool),
        todays_events(&pool, today_start),
        load_settings(&pool),
    )
    .map_err(ServiceError::from)?;

    let roll = classify(&employees, &events, now, today_start);
    let histogram = hourly_histogram(&events, today_start, config.display_tz, &settings);

    let counter = sqlx::query_scalar::<_, i64>(
        "SELECT count FROM present_counters WHERE day_id = ?",
    )
    .bind(day_id(now, config.display_tz, config.rollover_hour))
    .fetch_optional(pool.get_ref())
    .await
    .map_err(ServiceError::from)?
    .unwrap_or(0);

    info!(
        total = roll.total(),
        present = roll.present.len(),
        field_duty = roll.field_duty.len(),
        absent = roll.absent.len(),
        "Roll call computed"
    );

    let mut present_ids: Vec<String> = roll.present.iter().cloned().collect();
    let mut absent_ids: Vec<String> = roll.absent.iter().cloned().collect();
    let mut field_duty_ids: Vec<String> = roll.field_duty.iter().cloned().collect();
    present_ids.sort();
    absent_ids.sort();
    field_duty_ids.sort();

    Ok(HttpResponse::Ok().json(OverviewResponse {
        total: roll.total(),
        present: roll.present.len(),
        absent: roll.absent.len(),
        field_duty: roll.field_duty.len(),
        present_pct: roll.pct(roll.present.len()),
        absent_pct: roll.pct(roll.absent.len()),
        field_duty_pct: roll.pct(roll.field_duty.len()),
        present_ids,
        absent_ids,
        field_duty_ids,
        histogram,
        counter,
    }))
}

async fn todays_events(
    pool: &MySqlPool,
    today_start_ms: i64,
) -> Result<Vec<AttendanceEvent>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceEvent>(
        "SELECT * FROM attendance_events WHERE ts_ms >= ? ORDER BY ts_ms ASC, id ASC",
    )
    .bind(today_start_ms)
    .fetch_all(pool)
    .await
}
