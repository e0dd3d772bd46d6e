//! # API crate — RehabFlow client core
//!
//! Everything the web frontend does that is not rendering lives here: the hosted
//! backend client, the authentication lifecycle, the credential flows and the
//! dashboard aggregation. None of it depends on Dioxus; the `ui` crate plugs its
//! signals and router in through [`auth::StateCell`] and [`Navigator`].
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | Auth state, [`AuthController`](auth::AuthController), route guards, password policy |
//! | [`cards`] | Derived values for the dashboard cards (BMI, pain band, fallbacks) |
//! | [`config`] | Backend URL and anon key from the environment |
//! | [`dashboard`] | Concurrent latest-record lookups for the dashboard |
//! | [`error`] | HTTP-level errors of the hosted client |
//! | [`flows`] | Login and sign-up form flows |
//! | [`hosted`] | [`HostedClient`]: auth API and row API over HTTP |
//! | [`navigation`] | Destinations and the [`Navigator`] seam |

pub mod auth;
pub mod cards;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod flows;
pub mod hosted;
pub mod navigation;

#[cfg(test)]
mod testing;

pub use auth::{AuthController, AuthState, GuardDecision, StateCell};
pub use config::{BackendConfig, ConfigError};
pub use dashboard::{load_dashboard, load_dashboard_into, DashboardData, DashboardState};
pub use error::ApiError;
pub use flows::{FlowError, ValidationError};
pub use hosted::HostedClient;
pub use navigation::{Destination, Navigation, Navigator};
