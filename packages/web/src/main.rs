use api::{BackendConfig, Destination, HostedClient, Navigation};
use dioxus::prelude::*;

use ui::AuthProvider;
use views::{Dashboard, Login, Signup};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Shell)]
        #[route("/")]
        Root {},
        #[route("/login")]
        Login {},
        #[route("/signup")]
        Signup {},
        #[route("/dashboard")]
        Dashboard {},
}

impl From<Destination> for Route {
    fn from(destination: Destination) -> Self {
        match destination {
            Destination::Login => Route::Login {},
            Destination::Signup => Route::Signup {},
            Destination::Dashboard => Route::Dashboard {},
        }
    }
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::logger::init(dioxus::logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let config = use_hook(|| {
        let config = BackendConfig::load();
        if let Err(e) = &config {
            tracing::error!("Backend configuration unavailable: {e}");
        }
        config
    });

    rsx! {
        // Global app resources
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        document::Link { rel: "stylesheet", href: ui::UI_CSS }

        match config {
            Ok(config) => rsx! { Backed { config } },
            Err(e) => rsx! { Misconfigured { message: e.to_string() } },
        }
    }
}

/// Provides the backend client to everything below the router.
#[component]
fn Backed(config: BackendConfig) -> Element {
    use_context_provider(|| HostedClient::new(config));
    rsx! {
        Router::<Route> {}
    }
}

#[component]
fn Misconfigured(message: String) -> Element {
    rsx! {
        div {
            class: "misconfigured",
            h1 { "RehabFlow is not configured" }
            p { "{message}" }
        }
    }
}

/// Layout shared by every route: hosts the auth provider inside the router.
#[component]
fn Shell() -> Element {
    let nav = use_navigator();

    rsx! {
        AuthProvider {
            on_navigate: move |navigation: Navigation| match navigation {
                Navigation::Push(to) => {
                    nav.push(Route::from(to));
                }
                Navigation::Replace(to) => {
                    nav.replace(Route::from(to));
                }
            },
            Outlet::<Route> {}
        }
    }
}

/// Redirect `/` to `/dashboard`
#[component]
fn Root() -> Element {
    let nav = use_navigator();
    nav.replace(Route::Dashboard {});
    rsx! {}
}
