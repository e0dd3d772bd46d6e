//! # Backend contract — auth sessions and user-scoped rows
//!
//! The application never talks to a concrete backend directly. Everything goes
//! through two async traits so that the same flows run against the hosted service
//! (`api::HostedClient`) in the browser and against [`crate::MemoryStore`] in tests.
//!
//! ## [`SessionStore`]
//!
//! | Method | Contract |
//! |--------|----------|
//! | `get_session` | Current session or `None`. Never errors: failures degrade to `None`. |
//! | `subscribe` | Registers a listener on the change stream. The returned [`SessionChanges`] unsubscribes when dropped. |
//! | `sign_in_with_password` | Session on success, otherwise the service's message in an [`AuthError`]. |
//! | `sign_up` | Creates the account. The service may or may not start a session immediately. |
//! | `sign_out` | Always settles. Afterwards the change stream emits `SignedOut`. |
//!
//! ## [`RecordStore`]
//!
//! Row-level access policies are enforced by the backend; a rejected write shows up
//! as a [`StoreError`] like any other failure.

use std::fmt;
use std::future::Future;

use crate::feed::SessionChanges;
use crate::models::{Collection, Row, Session, User};

/// Rejection reported by the auth service. `message` is shown to the user as-is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthError {
    pub message: String,
}

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for AuthError {}

/// Failure of a row read or write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for StoreError {}

/// Result of a successful sign-up.
///
/// When the service requires email confirmation there is a user but no session yet.
#[derive(Clone, Debug, PartialEq)]
pub struct SignUp {
    pub user: Option<User>,
    pub session: Option<Session>,
}

/// Auth half of the hosted backend.
pub trait SessionStore {
    fn get_session(&self) -> impl Future<Output = Option<Session>>;

    fn subscribe(&self) -> SessionChanges;

    fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Session, AuthError>>;

    fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: Row,
    ) -> impl Future<Output = Result<SignUp, AuthError>>;

    fn sign_out(&self) -> impl Future<Output = ()>;
}

/// Row half of the hosted backend.
pub trait RecordStore {
    /// Update the rows whose owner column equals `id`.
    fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Row,
    ) -> impl Future<Output = Result<(), StoreError>>;

    fn insert(
        &self,
        collection: Collection,
        fields: Row,
    ) -> impl Future<Output = Result<(), StoreError>>;

    /// Create the row, or replace the existing one with the same `id`.
    fn upsert_by_identity(
        &self,
        collection: Collection,
        fields: Row,
    ) -> impl Future<Output = Result<(), StoreError>>;

    /// Most recent row (by `created_at`) owned by `user_id`.
    fn select_latest_by_user(
        &self,
        collection: Collection,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<Row>, StoreError>>;
}
