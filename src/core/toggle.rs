use crate::model::event::EventAction;

/// Next main-ledger action for a subject, given their most recent SUCCESS
/// LOGIN/LOGOUT event. No history defaults to LOGIN. Gate-pass open/close
/// toggles independently (see `core::gate_pass`); gate events must never be
/// fed in here.
pub fn next_action(last: Option<EventAction>) -> EventAction {
    match last {
        Some(EventAction::Login) => EventAction::Logout,
        _ => EventAction::Login,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_login_with_no_history() {
        assert_eq!(next_action(None), EventAction::Login);
    }

    #[test]
    fn alternates_strictly_from_login() {
        let mut last = None;
        let mut expected = EventAction::Login;
        for _ in 0..6 {
            let action = next_action(last);
            assert_eq!(action, expected);
            last = Some(action);
            expected = match expected {
                EventAction::Login => EventAction::Logout,
                _ => EventAction::Login,
            };
        }
    }

    #[test]
    fn logout_history_toggles_back_to_login() {
        assert_eq!(next_action(Some(EventAction::Logout)), EventAction::Login);
    }
}
