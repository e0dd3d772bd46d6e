//! # Auth controller — session lifecycle for one application root
//!
//! [`AuthController`] owns the only mutable copy of [`AuthState`] and is the only
//! code that changes it. The state lives in a [`StateCell`] supplied by the host:
//! a Dioxus signal in the browser, an `Rc<RefCell<_>>` in tests.
//!
//! ## Lifecycle
//!
//! | Step | Method | Effect |
//! |------|--------|--------|
//! | mount | [`subscribe`](AuthController::subscribe) | one listener on the store's change stream |
//! | mount | [`run`](AuthController::run) | applies every change event, in order |
//! | mount | [`initialize`](AuthController::initialize) | resolves the initial lookup |
//! | any time | [`sign_out`](AuthController::sign_out) | store sign-out, then redirect + refresh |
//! | unmount | [`teardown`](AuthController::teardown) | late results become no-ops |
//!
//! ## Sign-out redirects
//!
//! Both the explicit sign-out and a `SignedOut` change event leave for the login
//! view. Only the transition *into* [`AuthState::Anonymous`] does so, which makes
//! the redirect happen exactly once whichever of the two arrives first.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::StreamExt;
use store::{AuthEvent, Session, SessionChanges, SessionStore};

use super::session::AuthState;
use crate::navigation::{Destination, Navigator};

/// Host-provided storage for the auth state.
pub trait StateCell {
    fn get(&self) -> AuthState;

    /// Mutate the state in place. `None` when the owner is already gone.
    fn update<R>(&self, f: impl FnOnce(&mut AuthState) -> R) -> Option<R>;
}

impl StateCell for Rc<RefCell<AuthState>> {
    fn get(&self) -> AuthState {
        self.borrow().clone()
    }

    fn update<R>(&self, f: impl FnOnce(&mut AuthState) -> R) -> Option<R> {
        let mut state = self.try_borrow_mut().ok()?;
        Some(f(&mut state))
    }
}

/// Session lifecycle of one mounted application.
#[derive(Clone)]
pub struct AuthController<S, C, N> {
    store: S,
    state: C,
    navigator: N,
    attached: Rc<Cell<bool>>,
}

impl<S, C, N> AuthController<S, C, N>
where
    S: SessionStore,
    C: StateCell,
    N: Navigator,
{
    pub fn new(store: S, state: C, navigator: N) -> Self {
        Self {
            store,
            state,
            navigator,
            attached: Rc::new(Cell::new(true)),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn state(&self) -> AuthState {
        self.state.get()
    }

    /// Register the change-stream listener. Dropping the handle releases it.
    pub fn subscribe(&self) -> SessionChanges {
        self.store.subscribe()
    }

    /// Resolve the initial session lookup. An empty result is a normal outcome.
    pub async fn initialize(&self) {
        let session = self.store.get_session().await;
        if !self.attached.get() {
            return;
        }
        let found = session.is_some();
        match self.state.update(|state| state.resolve_initial(session)) {
            Some(true) => tracing::info!(authenticated = found, "initial session resolved"),
            Some(false) => tracing::debug!("initial session arrived after a change event, ignored"),
            None => {}
        }
    }

    /// Apply one change-stream event.
    pub fn handle_change(&self, event: AuthEvent, session: Option<Session>) {
        if !self.attached.get() {
            return;
        }
        tracing::debug!(%event, "session change");
        let entered_anonymous = self.state.update(|state| {
            let was_anonymous = state.is_anonymous();
            state.apply_change(session);
            state.is_anonymous() && !was_anonymous
        });
        if event == AuthEvent::SignedOut && entered_anonymous == Some(true) {
            self.leave();
        }
    }

    /// Apply events from `changes` until the stream ends or the owning task is
    /// dropped, which also releases the subscription.
    pub async fn run(&self, mut changes: SessionChanges) {
        while let Some((event, session)) = changes.next().await {
            self.handle_change(event, session);
        }
    }

    /// Sign out, then leave for the login view.
    pub async fn sign_out(&self) {
        self.store.sign_out().await;
        self.handle_change(AuthEvent::SignedOut, None);
    }

    /// Detach from the host. Anything resolving afterwards is dropped silently.
    pub fn teardown(&self) {
        self.attached.set(false);
    }

    fn leave(&self) {
        tracing::info!("signed out, returning to login");
        self.navigator.replace(Destination::Login);
        self.navigator.refresh();
    }
}

#[cfg(test)]
mod tests {
    use std::pin::pin;

    use futures::future::{select, Either};
    use store::{MemoryStore, Row};

    use super::*;
    use crate::testing::{controller, Recorded};

    const EMAIL: &str = "pat@example.com";
    const PASSWORD: &str = "Abcdef1!";

    fn store_with_account() -> MemoryStore {
        let store = MemoryStore::new();
        store.create_account(EMAIL, PASSWORD, Row::new());
        store
    }

    fn login_redirects(log: &[Recorded]) -> usize {
        log.iter()
            .filter(|r| **r == Recorded::Replace(Destination::Login))
            .count()
    }

    #[tokio::test]
    async fn test_initialize_without_session() {
        let (auth, nav) = controller(MemoryStore::new());
        assert!(auth.state().is_loading());
        auth.initialize().await;
        let state = auth.state();
        assert!(!state.is_loading());
        assert!(state.user().is_none());
        assert!(state.session().is_none());
        assert!(nav.log().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_with_restored_session() {
        let store = store_with_account();
        let session = store.restore_session(EMAIL).unwrap();
        let (auth, _nav) = controller(store);
        auth.initialize().await;
        assert_eq!(auth.state().session(), Some(&session));
        assert_eq!(auth.state().user().and_then(|u| u.email.as_deref()), Some(EMAIL));
    }

    #[tokio::test]
    async fn test_loading_never_returns() {
        let store = store_with_account();
        let (auth, _nav) = controller(store.clone());
        auth.initialize().await;
        let session = store.sign_in_with_password(EMAIL, PASSWORD).await.unwrap();
        auth.handle_change(AuthEvent::SignedIn, Some(session));
        auth.handle_change(AuthEvent::SignedOut, None);
        auth.initialize().await;
        assert!(!auth.state().is_loading());
    }

    #[tokio::test]
    async fn test_sign_out_redirects_once() {
        let store = store_with_account();
        store.restore_session(EMAIL);
        let (auth, nav) = controller(store.clone());
        auth.initialize().await;

        auth.sign_out().await;
        auth.sign_out().await;

        assert!(auth.state().is_anonymous());
        assert_eq!(store.sign_out_calls(), 2);
        assert_eq!(
            nav.log(),
            vec![Recorded::Replace(Destination::Login), Recorded::Refresh]
        );
    }

    #[tokio::test]
    async fn test_sign_out_event_before_explicit_completion() {
        let store = store_with_account();
        store.restore_session(EMAIL);
        let (auth, nav) = controller(store.clone());
        auth.initialize().await;

        // The change stream reports the sign-out before the explicit call settles.
        auth.handle_change(AuthEvent::SignedOut, None);
        auth.sign_out().await;

        assert!(auth.state().is_anonymous());
        assert_eq!(login_redirects(&nav.log()), 1);
    }

    #[tokio::test]
    async fn test_sign_out_with_stream_attached() {
        let store = store_with_account();
        store.restore_session(EMAIL);
        let (auth, nav) = controller(store.clone());
        let changes = auth.subscribe();
        auth.initialize().await;

        let run = pin!(auth.run(changes));
        let script = pin!(async {
            auth.sign_out().await;
            tokio::task::yield_now().await;
            tokio::task::yield_now().await;
        });
        match select(run, script).await {
            Either::Left(_) => panic!("change stream ended early"),
            Either::Right(_) => {}
        }

        assert!(auth.state().is_anonymous());
        assert_eq!(login_redirects(&nav.log()), 1);
    }

    #[tokio::test]
    async fn test_run_follows_external_revocation() {
        let store = store_with_account();
        let (auth, nav) = controller(store.clone());
        let changes = auth.subscribe();
        auth.initialize().await;

        let run = pin!(auth.run(changes));
        let script = pin!(async {
            store.sign_in_with_password(EMAIL, PASSWORD).await.unwrap();
            tokio::task::yield_now().await;
            assert!(auth.state().user().is_some());
            store.revoke_session();
            tokio::task::yield_now().await;
        });
        let _ = select(run, script).await;

        assert!(auth.state().is_anonymous());
        assert_eq!(
            nav.log(),
            vec![Recorded::Replace(Destination::Login), Recorded::Refresh]
        );
    }

    #[tokio::test]
    async fn test_non_sign_out_events_do_not_redirect() {
        let (auth, nav) = controller(store_with_account());
        auth.initialize().await;
        auth.handle_change(AuthEvent::TokenRefreshed, None);
        assert!(auth.state().is_anonymous());
        assert!(nav.log().is_empty());
    }

    #[tokio::test]
    async fn test_teardown_ignores_late_results() {
        let store = store_with_account();
        store.restore_session(EMAIL);
        let (auth, nav) = controller(store);
        auth.teardown();

        auth.initialize().await;
        auth.handle_change(AuthEvent::SignedOut, None);
        auth.sign_out().await;

        assert!(auth.state().is_loading());
        assert!(nav.log().is_empty());
    }

    #[tokio::test]
    async fn test_dropping_subscription_releases_listener() {
        let store = MemoryStore::new();
        let (auth, _nav) = controller(store.clone());
        let changes = auth.subscribe();
        assert_eq!(store.subscriber_count(), 1);
        drop(changes);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_busy_cell_skips_update() {
        let cell = Rc::new(RefCell::new(AuthState::default()));
        let _guard = cell.borrow_mut();
        assert_eq!(cell.update(|state| state.apply_change(None)), None);
    }
}
