use store::{AuthEvent, Session, SessionStore};

use super::{is_email, FlowError, ValidationError};
use crate::auth::{AuthController, StateCell};
use crate::navigation::{Destination, Navigator};

/// Login form contents. The view keeps them on failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_email(self.email.trim()) {
            return Err(ValidationError::Email);
        }
        if self.password.is_empty() {
            return Err(ValidationError::MissingPassword);
        }
        Ok(())
    }
}

/// Sign in with email and password, then refresh and go to the dashboard.
pub async fn login<S, C, N>(
    auth: &AuthController<S, C, N>,
    credentials: &Credentials,
) -> Result<Session, FlowError>
where
    S: SessionStore,
    C: StateCell,
    N: Navigator,
{
    credentials.validate()?;
    let session = auth
        .store()
        .sign_in_with_password(credentials.email.trim(), &credentials.password)
        .await?;

    // Publish the session before navigating so the dashboard guard sees it.
    auth.handle_change(AuthEvent::SignedIn, Some(session.clone()));
    auth.navigator().refresh();
    auth.navigator().push(Destination::Dashboard);
    Ok(session)
}

#[cfg(test)]
mod tests {
    use store::{AuthError, MemoryStore, Row};

    use super::*;
    use crate::testing::{controller, Recorded};

    fn store() -> MemoryStore {
        let store = MemoryStore::new();
        store.create_account("pat@example.com", "Abcdef1!", Row::new());
        store
    }

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_success() {
        let (auth, nav) = controller(store());
        auth.initialize().await;

        let session = login(&auth, &credentials(" pat@example.com ", "Abcdef1!"))
            .await
            .unwrap();

        assert_eq!(auth.state().session(), Some(&session));
        assert_eq!(
            nav.log(),
            vec![Recorded::Refresh, Recorded::Push(Destination::Dashboard)]
        );
    }

    #[tokio::test]
    async fn test_wrong_password_surfaces_service_message() {
        let (auth, nav) = controller(store());
        auth.initialize().await;

        let err = login(&auth, &credentials("pat@example.com", "Wrong1!x"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            FlowError::Rejected(AuthError::new("Invalid login credentials"))
        );
        assert_eq!(err.to_string(), "Invalid login credentials");
        let state = auth.state();
        assert!(!state.is_loading());
        assert!(state.user().is_none());
        assert!(nav.log().is_empty());
    }

    #[tokio::test]
    async fn test_service_message_is_passed_through() {
        let store = store();
        store.fail_sign_in_with("Email not confirmed");
        let (auth, _nav) = controller(store);

        let err = login(&auth, &credentials("pat@example.com", "Abcdef1!"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Email not confirmed");
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_the_store() {
        let store = store();
        store.fail_sign_in_with("should not be called");
        let (auth, nav) = controller(store);

        let err = login(&auth, &credentials("not-an-email", "x")).await.unwrap_err();
        assert_eq!(err, FlowError::Invalid(ValidationError::Email));

        let err = login(&auth, &credentials("pat@example.com", "")).await.unwrap_err();
        assert_eq!(err, FlowError::Invalid(ValidationError::MissingPassword));
        assert!(nav.log().is_empty());
    }
}
