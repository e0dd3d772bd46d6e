//! This crate contains all shared UI for the workspace.

use dioxus::prelude::*;

pub mod components;

pub mod cards;

pub const UI_CSS: Asset = asset!("/assets/ui.css");

mod navbar;
pub use navbar::Navbar;

mod auth;
pub use auth::{
    use_app_navigator, use_auth, use_auth_controller, use_backend, use_refresh_token, AppAuth,
    AppNavigator, AuthProvider, Backend, LogoutButton, RefreshToken, SignalCell,
};

mod guard;
pub use guard::{
    use_submissions, GuestOnly, LoadingPlaceholder, ProtectedRoute, SubmissionGuard, Submissions,
};
