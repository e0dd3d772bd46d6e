use api::cards::{format_bmi, format_measurement};
use dioxus::prelude::*;
use store::BaselineProfile;

use super::CardSkeleton;

#[component]
pub fn HealthMetricsCard(baseline: Option<BaselineProfile>, loading: bool) -> Element {
    if loading {
        return rsx! { CardSkeleton {} };
    }

    let Some(baseline) = baseline else {
        return rsx! {
            section {
                class: "card card-empty",
                h2 { class: "card-heading", "No Health Data" }
                p {
                    class: "card-subtitle",
                    "Add your height, weight, and age to get personalized insights."
                }
            }
        };
    };

    let height = format_measurement(baseline.height_cm);
    let weight = format_measurement(baseline.weight_kg);
    let age = baseline
        .age
        .map(|age| age.to_string())
        .unwrap_or_else(|| "--".to_string());
    let bmi = format_bmi(&baseline);

    rsx! {
        section {
            class: "card",
            h2 { class: "card-heading", "Health Metrics" }
            div {
                class: "metric-grid",
                Metric { label: "Height", value: "{height} cm" }
                Metric { label: "Weight", value: "{weight} kg" }
                Metric { label: "Age", value: "{age} yrs" }
                Metric { label: "BMI", value: bmi }
            }
        }
    }
}

#[component]
fn Metric(label: String, value: String) -> Element {
    rsx! {
        div {
            class: "metric",
            span { class: "metric-label", "{label}" }
            span { class: "metric-value", "{value}" }
        }
    }
}
