use dioxus::prelude::*;

/// Top bar with the product mark on the left and `children` on the right.
#[component]
pub fn Navbar(children: Element) -> Element {
    rsx! {
        nav {
            class: "navbar",
            div {
                class: "navbar-brand",
                span { class: "navbar-logo", "R" }
                span { class: "navbar-title", "RehabFlow" }
            }
            div {
                class: "navbar-actions",
                {children}
            }
        }
    }
}
