use api::cards::GamificationStats;
use dioxus::prelude::*;

use super::CardSkeleton;

#[component]
pub fn GamificationCard(stats: GamificationStats, loading: bool) -> Element {
    if loading {
        return rsx! { CardSkeleton {} };
    }

    rsx! {
        section {
            class: "card card-gamification",
            h2 { class: "card-heading", "Your Progress" }
            div {
                class: "metric-grid",
                div {
                    class: "metric",
                    span { class: "metric-label", "Total Points" }
                    span { class: "metric-value", "{stats.points}" }
                }
                div {
                    class: "metric",
                    span { class: "metric-label", "Day Streak" }
                    span { class: "metric-value", "{stats.streak}" }
                }
            }
        }
    }
}
