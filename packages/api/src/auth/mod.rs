//! Client-side authentication: session state, its controller, route guards and
//! the sign-up password policy.

mod controller;
mod guard;
mod password;
mod session;

pub use controller::{AuthController, StateCell};
pub use guard::{guest_only, protect, GuardDecision};
pub use password::{
    validate_password, MIN_PASSWORD_LENGTH, PASSWORD_POLICY_MESSAGE, PASSWORD_SYMBOLS,
};
pub use session::AuthState;
