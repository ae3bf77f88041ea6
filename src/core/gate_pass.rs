use crate::model::event::EventAction;
use crate::model::gate_pass::GatePass;

/// Outcome of presenting a credential at the gate. The store-side
/// precondition (must be clocked in) and the conditional close live in the
/// API layer; this is only the state transition.
#[derive(Debug, PartialEq)]
pub enum GateDecision {
    /// No open pass: record a departure. CLOSED → OPEN.
    Depart,
    /// Open pass found: record the return and its duration. OPEN → CLOSED.
    Return { pass_id: u64, duration: String },
}

impl GateDecision {
    pub fn action(&self) -> EventAction {
        match self {
            GateDecision::Depart => EventAction::GateOut,
            GateDecision::Return { .. } => EventAction::GateIn,
        }
    }
}

pub fn decide(open_pass: Option<&GatePass>, now_ms: i64) -> GateDecision {
    match open_pass {
        None => GateDecision::Depart,
        Some(pass) => GateDecision::Return {
            pass_id: pass.id,
            duration: format_duration(now_ms.saturating_sub(pass.time_out)),
        },
    }
}

/// Floor to whole hours and minutes, e.g. "1h 23m".
pub fn format_duration(elapsed_ms: i64) -> String {
    let elapsed_ms = elapsed_ms.max(0);
    let hours = elapsed_ms / 3_600_000;
    let minutes = (elapsed_ms % 3_600_000) / 60_000;
    format!("{hours}h {minutes}m")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_pass(id: u64, time_out: i64) -> GatePass {
        GatePass {
            id,
            employee_id: "E1".to_string(),
            employee_name: "E1".to_string(),
            time_out,
            time_in: None,
            duration: None,
            date: "29/08/2026".to_string(),
        }
    }

    #[test]
    fn no_open_pass_departs() {
        let d = decide(None, 1_000_000);
        assert_eq!(d, GateDecision::Depart);
        assert_eq!(d.action(), EventAction::GateOut);
    }

    #[test]
    fn open_pass_returns_with_duration() {
        let t0 = 1_700_000_000_000;
        let now = t0 + 3_600_000 + 5 * 60_000;
        let pass = open_pass(7, t0);
        match decide(Some(&pass), now) {
            GateDecision::Return { pass_id, duration } => {
                assert_eq!(pass_id, 7);
                assert_eq!(duration, "1h 5m");
            }
            other => panic!("expected Return, got {other:?}"),
        }
    }

    #[test]
    fn depart_then_return_never_double_opens() {
        let t0 = 1_700_000_000_000;
        // First presentation: nothing open, so depart.
        assert_eq!(decide(None, t0), GateDecision::Depart);
        // Second presentation sees the open record and must close it.
        let pass = open_pass(1, t0);
        assert_eq!(decide(Some(&pass), t0 + 60_000).action(), EventAction::GateIn);
    }

    #[test]
    fn duration_floors_and_never_goes_negative() {
        assert_eq!(format_duration(59_999), "0h 0m");
        assert_eq!(format_duration(60_000), "0h 1m");
        assert_eq!(format_duration(-5), "0h 0m");
    }
}
