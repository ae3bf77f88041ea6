use std::collections::HashSet;

use chrono_tz::Tz;
use serde::Serialize;
use utoipa::ToSchema;

use crate::core::business_day::local_hour;
use crate::model::employee::Employee;
use crate::model::event::{AttendanceEvent, EventAction, LogStatus, SubjectType};
use crate::model::settings::SystemSettings;

/// Fallback work-day window when the stored settings are unparseable.
const DEFAULT_DAY_START_HOUR: u32 = 6;
const DEFAULT_DAY_END_HOUR: u32 = 18;

/// Disjoint, exhaustive partition of the registry for the current business
/// day. `present + field_duty + absent` always equals the full registry.
#[derive(Debug)]
pub struct RollCall {
    pub present: HashSet<String>,
    pub field_duty: HashSet<String>,
    pub absent: HashSet<String>,
}

impl RollCall {
    pub fn total(&self) -> usize {
        self.present.len() + self.field_duty.len() + self.absent.len()
    }

    pub fn pct(&self, bucket: usize) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            bucket as f64 / total as f64 * 100.0
        }
    }
}

/// Partitions the registry by precedence: a physical scan today beats a
/// field-duty assignment beats nothing. An employee on outside work who
/// still scans in counts as present, not field duty.
pub fn classify(
    employees: &[Employee],
    events: &[AttendanceEvent],
    now_ms: i64,
    today_start_ms: i64,
) -> RollCall {
    let mut scanned_today: HashSet<&str> = HashSet::new();
    for event in events {
        if event.status != LogStatus::Success || event.subject_type != SubjectType::Employee {
            continue;
        }
        if event.action == EventAction::Login && event.ts_ms >= today_start_ms {
            scanned_today.insert(event.subject_id.trim());
        }
    }

    let mut roll = RollCall {
        present: HashSet::new(),
        field_duty: HashSet::new(),
        absent: HashSet::new(),
    };

    for emp in employees {
        let id = emp.id.trim().to_string();
        if scanned_today.contains(id.as_str()) {
            roll.present.insert(id);
        } else if emp.on_field_duty(now_ms) {
            roll.field_duty.insert(id);
        } else {
            roll.absent.insert(id);
        }
    }
    roll
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HourBucket {
    #[schema(example = "08:00")]
    pub hour: String,
    pub count: usize,
}

/// Buckets today's successful staff LOGIN events by local hour over the configured
/// work-day window. Malformed `day_start`/`day_end` fall back to 6..18
/// rather than breaking the dashboard.
pub fn hourly_histogram(
    events: &[AttendanceEvent],
    today_start_ms: i64,
    tz: Tz,
    settings: &SystemSettings,
) -> Vec<HourBucket> {
    let start = parse_hour(&settings.day_start).unwrap_or(DEFAULT_DAY_START_HOUR);
    let end = parse_hour(&settings.day_end).unwrap_or(DEFAULT_DAY_END_HOUR);
    let hours: Vec<u32> = if end >= start {
        (start..=end).collect()
    } else {
        vec![start]
    };

    let todays_logins: Vec<u32> = events
        .iter()
        .filter(|e| {
            e.status == LogStatus::Success
                && e.action == EventAction::Login
                && e.subject_type == SubjectType::Employee
                && e.ts_ms >= today_start_ms
        })
        .map(|e| local_hour(e.ts_ms, tz))
        .collect();

    hours
        .into_iter()
        .map(|h| HourBucket {
            hour: format!("{h:02}:00"),
            count: todays_logins.iter().filter(|&&lh| lh == h).count(),
        })
        .collect()
}

/// Leading hour of an `HH:MM` string; `None` if unparseable or out of range.
fn parse_hour(value: &str) -> Option<u32> {
    let hour: u32 = value.split(':').next()?.trim().parse().ok()?;
    (hour <= 23).then_some(hour)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Tz;

    const HARARE: Tz = chrono_tz::Africa::Harare;

    fn employee(id: &str, outside_until: Option<i64>) -> Employee {
        Employee {
            id: id.to_string(),
            name: id.to_string(),
            email: None,
            department: "Ops".to_string(),
            pin: "0000".to_string(),
            fingerprint_hash: String::new(),
            qr_code_data: String::new(),
            outside_work_until: outside_until,
            created_at: 0,
        }
    }

    fn login(subject: &str, ts_ms: i64) -> AttendanceEvent {
        AttendanceEvent {
            id: 0,
            subject_id: subject.to_string(),
            subject_name: subject.to_string(),
            ts_ms,
            status: LogStatus::Success,
            action: EventAction::Login,
            confidence: 1.0,
            subject_type: SubjectType::Employee,
            category: None,
            is_outside_work: false,
        }
    }

    fn now() -> i64 {
        HARARE
            .with_ymd_and_hms(2026, 8, 29, 10, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn partition_is_disjoint_and_exhaustive() {
        let now_ms = now();
        let today = now_ms - 10 * 3_600_000;
        let staff = vec![
            employee("A", None),
            employee("B", Some(now_ms + 86_400_000)),
            employee("C", None),
        ];
        let events = vec![login("A", now_ms - 3_600_000)];
        let roll = classify(&staff, &events, now_ms, today);

        assert_eq!(roll.total(), staff.len());
        assert!(roll.present.is_disjoint(&roll.field_duty));
        assert!(roll.present.is_disjoint(&roll.absent));
        assert!(roll.field_duty.is_disjoint(&roll.absent));
        assert!(roll.present.contains("A"));
        assert!(roll.field_duty.contains("B"));
        assert!(roll.absent.contains("C"));
    }

    #[test]
    fn physical_scan_beats_field_duty() {
        let now_ms = now();
        let today = now_ms - 10 * 3_600_000;
        let staff = vec![employee("A", Some(now_ms + 86_400_000))];
        let events = vec![login("A", now_ms - 3_600_000)];
        let roll = classify(&staff, &events, now_ms, today);
        assert!(roll.present.contains("A"));
        assert!(roll.field_duty.is_empty());
    }

    #[test]
    fn expired_field_duty_is_absent() {
        let now_ms = now();
        let staff = vec![employee("A", Some(now_ms - 1))];
        let roll = classify(&staff, &[], now_ms, now_ms - 10 * 3_600_000);
        assert!(roll.absent.contains("A"));
    }

    #[test]
    fn yesterdays_scan_does_not_count() {
        let now_ms = now();
        let today = now_ms - 10 * 3_600_000;
        let staff = vec![employee("A", None)];
        let events = vec![login("A", today - 3_600_000)];
        let roll = classify(&staff, &events, now_ms, today);
        assert!(roll.absent.contains("A"));
    }

    #[test]
    fn histogram_buckets_by_local_hour() {
        let eight = HARARE
            .with_ymd_and_hms(2026, 8, 29, 8, 15, 0)
            .unwrap()
            .timestamp_millis();
        let events = vec![login("A", eight), login("B", eight + 60_000)];
        let today = eight - 3 * 3_600_000;
        let buckets = hourly_histogram(&events, today, HARARE, &SystemSettings::default());

        assert_eq!(buckets.len(), 13); // 06:00..=18:00
        assert_eq!(buckets[0].hour, "06:00");
        let eight_bucket = buckets.iter().find(|b| b.hour == "08:00").unwrap();
        assert_eq!(eight_bucket.count, 2);
    }

    #[test]
    fn histogram_ignores_visitor_logins() {
        let eight = HARARE
            .with_ymd_and_hms(2026, 8, 29, 8, 15, 0)
            .unwrap()
            .timestamp_millis();
        let mut visitor = login("visitor-1", eight);
        visitor.subject_type = SubjectType::Visitor;
        let events = vec![visitor, login("A", eight + 60_000)];
        let today = eight - 3 * 3_600_000;
        let buckets = hourly_histogram(&events, today, HARARE, &SystemSettings::default());

        let eight_bucket = buckets.iter().find(|b| b.hour == "08:00").unwrap();
        assert_eq!(eight_bucket.count, 1);
    }

    #[test]
    fn malformed_window_falls_back_to_defaults() {
        let settings = SystemSettings {
            day_start: "banana".to_string(),
            day_end: "99:00".to_string(),
            ..SystemSettings::default()
        };
        let buckets = hourly_histogram(&[], 0, HARARE, &settings);
        assert_eq!(buckets.first().unwrap().hour, "06:00");
        assert_eq!(buckets.last().unwrap().hour, "18:00");
    }

    #[test]
    fn inverted_window_degrades_to_single_bucket() {
        let settings = SystemSettings {
            day_start: "18:00".to_string(),
            day_end: "06:00".to_string(),
            ..SystemSettings::default()
        };
        let buckets = hourly_histogram(&[], 0, HARARE, &settings);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].hour, "18:00");
    }
}
