use api::cards::{cause_label, location_label, PainBand};
use dioxus::prelude::*;
use store::InjuryAssessment;

use super::CardSkeleton;

#[component]
pub fn InjuryStatusCard(assessment: Option<InjuryAssessment>, loading: bool) -> Element {
    if loading {
        return rsx! { CardSkeleton {} };
    }

    let Some(assessment) = assessment else {
        return rsx! {
            section {
                class: "card card-empty",
                h2 { class: "card-heading", "No Active Assessment" }
                p {
                    class: "card-subtitle",
                    "Assess your injury to generate a personalized rehab plan."
                }
            }
        };
    };

    let band = PainBand::from_level(assessment.pain_level);
    let location = location_label(&assessment.pain_location);
    let cause = cause_label(&assessment).to_string();
    let band_class = band.class();
    let band_label = band.label();
    let pain_level = assessment.pain_level;

    rsx! {
        section {
            class: "card",
            h2 { class: "card-heading", "Current Injury" }
            p { class: "card-subtitle capitalize", "{cause}" }
            div {
                class: "metric-grid",
                div {
                    class: "metric",
                    span { class: "metric-label", "Location" }
                    span { class: "metric-value capitalize", "{location}" }
                }
                div {
                    class: "metric {band_class}",
                    span { class: "metric-label", "Pain Level" }
                    span { class: "metric-value", "{pain_level}/10" }
                    span { class: "pain-band", "{band_label}" }
                }
            }
        }
    }
}
