//! Client-side authentication state.

use store::{Session, User};

/// What the application currently knows about the signed-in user.
///
/// The user is always read out of the session, so "user present" and "session
/// present" cannot disagree.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AuthState {
    /// The initial session lookup has not resolved yet.
    #[default]
    Unresolved,
    Authenticated(Session),
    Anonymous,
}

impl AuthState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Unresolved)
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, AuthState::Anonymous)
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.session().map(|session| &session.user)
    }

    fn from_session(session: Option<Session>) -> Self {
        match session {
            Some(session) => AuthState::Authenticated(session),
            None => AuthState::Anonymous,
        }
    }

    /// Apply the result of the initial session lookup.
    ///
    /// Only an unresolved state takes it: once the change stream has spoken, its
    /// answer is newer than whatever the lookup started from. Returns whether the
    /// state changed.
    pub fn resolve_initial(&mut self, session: Option<Session>) -> bool {
        if !self.is_loading() {
            return false;
        }
        *self = Self::from_session(session);
        true
    }

    /// Replace the state with a change-stream payload. Never returns to
    /// [`AuthState::Unresolved`].
    pub fn apply_change(&mut self, session: Option<Session>) {
        *self = Self::from_session(session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::Row;

    fn session(id: &str) -> Session {
        Session {
            access_token: format!("at-{id}"),
            refresh_token: format!("rt-{id}"),
            expires_at: None,
            user: User {
                id: id.to_string(),
                email: Some(format!("{id}@example.com")),
                user_metadata: Row::new(),
            },
        }
    }

    fn assert_consistent(state: &AuthState) {
        assert_eq!(state.user().is_some(), state.session().is_some());
    }

    #[test]
    fn test_starts_loading() {
        let state = AuthState::default();
        assert!(state.is_loading());
        assert!(state.user().is_none());
        assert_consistent(&state);
    }

    #[test]
    fn test_initial_resolution_happens_once() {
        let mut state = AuthState::default();
        assert!(state.resolve_initial(Some(session("u1"))));
        assert_eq!(state.user().map(|u| u.id.as_str()), Some("u1"));
        assert!(!state.is_loading());

        // A second (late) resolution is ignored.
        assert!(!state.resolve_initial(None));
        assert_eq!(state.user().map(|u| u.id.as_str()), Some("u1"));
    }

    #[test]
    fn test_change_stream_wins_over_late_initial_lookup() {
        let mut state = AuthState::default();
        state.apply_change(None);
        assert!(state.is_anonymous());
        assert!(!state.resolve_initial(Some(session("stale"))));
        assert!(state.is_anonymous());
    }

    #[test]
    fn test_transitions_keep_user_and_session_together() {
        let mut state = AuthState::default();
        let steps = [Some(session("u1")), None, Some(session("u2")), None, None];
        for step in steps {
            state.apply_change(step);
            assert!(!state.is_loading());
            assert_consistent(&state);
        }
        assert!(state.is_anonymous());
    }
}
