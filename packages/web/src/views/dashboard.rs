//! Patient dashboard: greeting, health metrics, injury status and progress.

use api::cards::{welcome_name, GamificationStats};
use api::{load_dashboard_into, DashboardState};
use dioxus::prelude::*;
use ui::cards::{GamificationCard, HealthMetricsCard, InjuryStatusCard, WelcomeCard};
use ui::{use_auth, use_backend, use_refresh_token, LogoutButton, Navbar, ProtectedRoute};

/// Dashboard page component.
#[component]
pub fn Dashboard() -> Element {
    rsx! {
        ProtectedRoute { DashboardContent {} }
    }
}

#[component]
fn DashboardContent() -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let refresh = use_refresh_token();
    let mut dashboard = use_signal(DashboardState::default);

    let user_id = use_memo(move || auth.read().user().map(|user| user.id.clone()));

    // Re-runs when the signed-in user changes or a refresh is requested.
    let _ = use_resource(move || {
        let backend = backend.clone();
        let user_id = user_id();
        let _generation = refresh.generation();
        async move {
            let Some(user_id) = user_id else {
                return;
            };
            load_dashboard_into(&backend, &user_id, |next| {
                if let Ok(mut state) = dashboard.try_write() {
                    *state = next;
                }
            })
            .await;
        }
    });

    let DashboardState { loading, data } = dashboard();
    let user = auth.read().user().cloned();
    let name = welcome_name(data.profile.as_ref(), user.as_ref()).to_string();
    let stats = GamificationStats::from_profile(data.profile.as_ref());

    rsx! {
        Navbar {
            LogoutButton {}
        }
        main {
            class: "dashboard",
            WelcomeCard { name, loading }
            div {
                class: "dashboard-grid",
                HealthMetricsCard { baseline: data.baseline, loading }
                InjuryStatusCard { assessment: data.assessment, loading }
                GamificationCard { stats, loading }
            }
        }
    }
}
