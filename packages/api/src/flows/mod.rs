//! # Credential form flows — login and sign-up
//!
//! Each flow validates its form locally, calls the [`SessionStore`](store::SessionStore)
//! and drives navigation through the [`AuthController`](crate::auth::AuthController)'s
//! navigator. Errors come in two kinds, both carried by [`FlowError`]:
//!
//! | Kind | Raised | Network touched |
//! |------|--------|-----------------|
//! | [`ValidationError`] | before any request | no |
//! | [`AuthError`] | by the auth service, message verbatim | yes |
//!
//! Failed enrichment writes after sign-up are not errors; they are listed in the
//! [`SignupReport`].

mod login;
mod signup;

pub use login::{login, Credentials};
pub use signup::{signup, EnrichmentFailure, EnrichmentStep, SignupForm, SignupReport, SignupRequest};

use serde_json::Value;
use store::{AuthError, Row};

use crate::auth::PASSWORD_POLICY_MESSAGE;

/// A form field that failed local validation. `Display` is shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a valid email address.")]
    Email,
    #[error("Please enter your password.")]
    MissingPassword,
    #[error("{}", PASSWORD_POLICY_MESSAGE)]
    WeakPassword,
    #[error("Please enter your full name.")]
    FullName,
    #[error("Age must be a whole number between 1 and 120.")]
    Age,
    #[error("Height must be between 50 and 300 cm.")]
    Height,
    #[error("Weight must be between 20 and 500 kg.")]
    Weight,
    #[error("Unknown gender {0:?}.")]
    Gender(String),
    #[error("Unsupported language {0:?}.")]
    Language(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Rejected(#[from] AuthError),
}

/// One `@`, a non-empty local part, and a dotted domain without empty labels.
pub(crate) fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

pub(crate) fn into_row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => Row::new(),
    }
}
