use api::cards::welcome_date;
use dioxus::prelude::*;

use super::CardSkeleton;

#[component]
pub fn WelcomeCard(name: String, loading: bool) -> Element {
    if loading {
        return rsx! { CardSkeleton { class: "card-welcome" } };
    }

    let today = welcome_date(chrono::Local::now().date_naive());

    rsx! {
        section {
            class: "card card-welcome",
            p { class: "card-eyebrow", "{today}" }
            h1 { class: "card-title", "Welcome back, {name}" }
            p {
                class: "card-subtitle",
                "Here is an overview of your recovery."
            }
        }
    }
}
