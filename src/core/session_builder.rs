use std::collections::HashMap;

use chrono_tz::Tz;

use crate::core::business_day::{date_key, time_hm};
use crate::model::employee::Employee;
use crate::model::event::{AttendanceEvent, EventAction, LogStatus};
use crate::model::session::{AttendanceSession, NO_ENTRY, ONSITE};

/// Folds the raw event log into per-subject, per-day sessions.
///
/// Pure function of its input: called on every read, output never persisted.
/// Only SUCCESS LOGIN/LOGOUT events participate; gate movements are a
/// separate ledger and are skipped here.
pub fn build_sessions(
    events: &[AttendanceEvent],
    employees: &[Employee],
    tz: Tz,
) -> Vec<AttendanceSession> {
    let dept_map: HashMap<&str, &str> = employees
        .iter()
        .map(|e| (e.id.as_str(), e.department.as_str()))
        .collect();

    let mut ordered: Vec<&AttendanceEvent> = events
        .iter()
        .filter(|e| e.status == LogStatus::Success && e.action.is_main_ledger())
        .collect();
    // Equal timestamps fold in insertion order, whatever order the query
    // returned them in.
    ordered.sort_by_key(|e| (e.ts_ms, e.id));

    // Subjects keep first-seen order so the fold is deterministic; the final
    // sort below only fixes the display order.
    let mut subject_order: Vec<String> = Vec::new();
    let mut by_subject: HashMap<String, Vec<AttendanceSession>> = HashMap::new();

    for event in ordered {
        let subject_id = event.subject_id.trim().to_string();
        let day = date_key(event.ts_ms, tz);
        let hm = time_hm(event.ts_ms, tz);
        let department = dept_map
            .get(subject_id.as_str())
            .copied()
            .unwrap_or("External")
            .to_string();

        if !by_subject.contains_key(&subject_id) {
            subject_order.push(subject_id.clone());
        }
        let sessions = by_subject.entry(subject_id.clone()).or_default();

        match event.action {
            EventAction::Login => {
                sessions.push(AttendanceSession {
                    subject_id,
                    name: event.subject_name.clone(),
                    date: day,
                    time_in: hm,
                    time_out: ONSITE.to_string(),
                    department,
                    subject_type: event.subject_type,
                });
            }
            EventAction::Logout => {
                // Close the most recently opened session for the same day.
                let open = sessions
                    .iter_mut()
                    .rev()
                    .find(|s| s.time_out == ONSITE && s.date == day);
                match open {
                    Some(session) => session.time_out = hm,
                    None => {
                        // Orphan logout: self-heal with a partial session.
                        sessions.push(AttendanceSession {
                            subject_id,
                            name: event.subject_name.clone(),
                            date: day,
                            time_in: NO_ENTRY.to_string(),
                            time_out: hm,
                            department,
                            subject_type: event.subject_type,
                        });
                    }
                }
            }
            // Gate movements were filtered out above.
            _ => {}
        }
    }

    let mut flat: Vec<AttendanceSession> = subject_order
        .into_iter()
        .flat_map(|id| by_subject.remove(&id).unwrap_or_default())
        .collect();

    // Newest day first, then latest entry first. Zero-padded HH:MM compares
    // correctly as a string; the NO_ENTRY sentinel sorts last within a day.
    flat.sort_by(|a, b| {
        sortable_date(&b.date)
            .cmp(&sortable_date(&a.date))
            .then_with(|| b.time_in.cmp(&a.time_in))
    });
    flat
}

/// `DD/MM/YYYY` → `(year, month, day)` for ordering.
fn sortable_date(key: &str) -> (u16, u8, u8) {
    let mut parts = key.splitn(3, '/');
    let d = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let m = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let y = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    (y, m, d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::event::SubjectType;
    use chrono::TimeZone;
    use chrono_tz::Tz;

    const HARARE: Tz = chrono_tz::Africa::Harare;

    fn event(subject: &str, action: EventAction, ts_ms: i64, status: LogStatus) -> AttendanceEvent {
        AttendanceEvent {
            id: 0,
            subject_id: subject.to_string(),
            subject_name: format!("{subject} name"),
            ts_ms,
            status,
            action,
            confidence: 1.0,
            subject_type: SubjectType::Employee,
            category: None,
            is_outside_work: false,
        }
    }

    fn employee(id: &str, department: &str) -> Employee {
        Employee {
            id: id.to_string(),
            name: format!("{id} name"),
            email: None,
            department: department.to_string(),
            pin: "0000".to_string(),
            fingerprint_hash: String::new(),
            qr_code_data: String::new(),
            outside_work_until: None,
            created_at: 0,
        }
    }

    fn morning() -> i64 {
        HARARE
            .with_ymd_and_hms(2026, 8, 29, 8, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn login_logout_pair_closes_one_session() {
        let t0 = morning();
        let events = vec![
            event("E1", EventAction::Login, t0, LogStatus::Success),
            event("E1", EventAction::Logout, t0 + 3_600_000, LogStatus::Success),
        ];
        let sessions = build_sessions(&events, &[employee("E1", "Ops")], HARARE);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].time_in, "08:00");
        assert_eq!(sessions[0].time_out, "09:00");
        assert_eq!(sessions[0].department, "Ops");
    }

    #[test]
    fn unclosed_login_stays_onsite() {
        let events = vec![event("E1", EventAction::Login, morning(), LogStatus::Success)];
        let sessions = build_sessions(&events, &[], HARARE);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].time_out, ONSITE);
        assert_eq!(sessions[0].department, "External");
    }

    #[test]
    fn orphan_logout_becomes_partial_session() {
        let events = vec![event("E1", EventAction::Logout, morning(), LogStatus::Success)];
        let sessions = build_sessions(&events, &[], HARARE);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].time_in, NO_ENTRY);
        assert_eq!(sessions[0].time_out, "08:00");
    }

    #[test]
    fn logout_does_not_close_yesterdays_session() {
        let t0 = morning();
        let next_day = t0 + 24 * 3_600_000;
        let events = vec![
            event("E1", EventAction::Login, t0, LogStatus::Success),
            event("E1", EventAction::Logout, next_day, LogStatus::Success),
        ];
        let sessions = build_sessions(&events, &[], HARARE);
        assert_eq!(sessions.len(), 2);
        // Yesterday's login remains open, today's logout is an orphan.
        assert!(sessions.iter().any(|s| s.time_out == ONSITE));
        assert!(sessions.iter().any(|s| s.time_in == NO_ENTRY));
    }

    #[test]
    fn failed_and_gate_events_are_ignored() {
        let t0 = morning();
        let events = vec![
            event("E1", EventAction::Login, t0, LogStatus::Failed),
            event("E1", EventAction::GateOut, t0 + 1000, LogStatus::Success),
            event("E1", EventAction::GateIn, t0 + 2000, LogStatus::Success),
        ];
        assert!(build_sessions(&events, &[], HARARE).is_empty());
    }

    #[test]
    fn rebuilding_is_idempotent() {
        let t0 = morning();
        let events = vec![
            event("E2", EventAction::Login, t0 + 60_000, LogStatus::Success),
            event("E1", EventAction::Login, t0, LogStatus::Success),
            event("E1", EventAction::Logout, t0 + 3_600_000, LogStatus::Success),
            event("E2", EventAction::Logout, t0 + 7_200_000, LogStatus::Success),
        ];
        let staff = vec![employee("E1", "Ops"), employee("E2", "Admin")];
        let first = build_sessions(&events, &staff, HARARE);
        let second = build_sessions(&events, &staff, HARARE);
        assert_eq!(first, second);
    }

    #[test]
    fn ordering_is_newest_day_then_latest_entry() {
        let t0 = morning();
        let yesterday = t0 - 24 * 3_600_000;
        let events = vec![
            event("E1", EventAction::Login, yesterday, LogStatus::Success),
            event("E2", EventAction::Login, t0, LogStatus::Success),
            event("E3", EventAction::Login, t0 + 60_000, LogStatus::Success),
        ];
        let sessions = build_sessions(&events, &[], HARARE);
        assert_eq!(sessions[0].subject_id, "E3");
        assert_eq!(sessions[1].subject_id, "E2");
        assert_eq!(sessions[2].subject_id, "E1");
    }

    #[test]
    fn equal_timestamps_pair_in_insertion_order() {
        let t0 = morning();
        // Newest-first query order: the logout row (inserted second) comes
        // first, and both share the same millisecond.
        let mut logout = event("E1", EventAction::Logout, t0, LogStatus::Success);
        logout.id = 2;
        let mut login = event("E1", EventAction::Login, t0, LogStatus::Success);
        login.id = 1;
        let sessions = build_sessions(&[logout, login], &[], HARARE);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].time_in, "08:00");
        assert_eq!(sessions[0].time_out, "08:00");
    }

    #[test]
    fn subject_ids_are_trimmed_before_grouping() {
        let t0 = morning();
        let events = vec![
            event(" E1 ", EventAction::Login, t0, LogStatus::Success),
            event("E1", EventAction::Logout, t0 + 3_600_000, LogStatus::Success),
        ];
        let sessions = build_sessions(&events, &[], HARARE);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].time_out, "09:00");
    }
}
