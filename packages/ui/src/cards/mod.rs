//! Dashboard cards. Pure rendering over values derived in `api::cards`.

mod gamification;
mod health_metrics;
mod injury_status;
mod welcome;

pub use gamification::GamificationCard;
pub use health_metrics::HealthMetricsCard;
pub use injury_status::InjuryStatusCard;
pub use welcome::WelcomeCard;

use dioxus::prelude::*;

/// Pulsing block shown in place of a card while its data loads.
#[component]
fn CardSkeleton(#[props(default = "".to_string())] class: String) -> Element {
    rsx! {
        div { class: "card card-skeleton {class}" }
    }
}
