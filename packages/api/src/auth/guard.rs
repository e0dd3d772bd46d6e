//! Route protection as a pure projection of [`AuthState`].

use super::session::AuthState;
use crate::navigation::Destination;

/// What a guarded view should do for the current auth state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show the neutral placeholder and nothing else.
    Loading,
    /// Show the placeholder while navigating away.
    Redirect(Destination),
    Render,
}

/// Views that require a signed-in user.
pub fn protect(state: &AuthState) -> GuardDecision {
    match state {
        AuthState::Unresolved => GuardDecision::Loading,
        AuthState::Anonymous => GuardDecision::Redirect(Destination::Login),
        AuthState::Authenticated(_) => GuardDecision::Render,
    }
}

/// Login and sign-up: a signed-in user is sent on to the dashboard. The forms
/// stay usable while the initial lookup is pending.
///
/// While `submitting` the form keeps rendering even once a session appears: the
/// submitted flow still has writes to make and navigates by itself when done.
pub fn guest_only(state: &AuthState, submitting: bool) -> GuardDecision {
    match state {
        AuthState::Authenticated(_) if !submitting => {
            GuardDecision::Redirect(Destination::Dashboard)
        }
        AuthState::Authenticated(_) | AuthState::Unresolved | AuthState::Anonymous => {
            GuardDecision::Render
        }
    }
}

#[cfg(test)]
mod tests {
    use store::{Row, Session, User};

    use super::*;

    fn authenticated() -> AuthState {
        AuthState::Authenticated(Session {
            access_token: "at".into(),
            refresh_token: "rt".into(),
            expires_at: None,
            user: User {
                id: "u1".into(),
                email: None,
                user_metadata: Row::new(),
            },
        })
    }

    #[test]
    fn test_protect() {
        assert_eq!(protect(&AuthState::Unresolved), GuardDecision::Loading);
        assert_eq!(
            protect(&AuthState::Anonymous),
            GuardDecision::Redirect(Destination::Login)
        );
        assert_eq!(protect(&authenticated()), GuardDecision::Render);
    }

    #[test]
    fn test_protect_follows_revocation() {
        let mut state = authenticated();
        assert_eq!(protect(&state), GuardDecision::Render);
        state.apply_change(None);
        assert_eq!(
            protect(&state),
            GuardDecision::Redirect(Destination::Login)
        );
    }

    #[test]
    fn test_guest_only() {
        assert_eq!(guest_only(&AuthState::Unresolved, false), GuardDecision::Render);
        assert_eq!(guest_only(&AuthState::Anonymous, false), GuardDecision::Render);
        assert_eq!(
            guest_only(&authenticated(), false),
            GuardDecision::Redirect(Destination::Dashboard)
        );
    }

    #[test]
    fn test_guest_only_holds_redirect_while_submitting() {
        assert_eq!(guest_only(&authenticated(), true), GuardDecision::Render);
        assert_eq!(guest_only(&AuthState::Anonymous, true), GuardDecision::Render);
    }
}
