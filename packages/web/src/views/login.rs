//! Login page view with email/password form.

use api::flows::{login, Credentials};
use dioxus::prelude::*;
use ui::components::{Button, ButtonVariant, FormError, Input, Label};
use ui::{use_auth_controller, use_submissions, GuestOnly};

/// Login page component.
#[component]
pub fn Login() -> Element {
    rsx! {
        GuestOnly { LoginForm {} }
    }
}

#[component]
fn LoginForm() -> Element {
    let auth = use_auth_controller();
    let submissions = use_submissions();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let handle_login = move |evt: FormEvent| {
        evt.prevent_default();
        let auth = auth.clone();
        let submission = submissions.begin();
        spawn(async move {
            let _submission = submission;
            error.set(None);
            loading.set(true);

            let credentials = Credentials {
                email: email(),
                password: password(),
            };
            if let Err(e) = login(&auth, &credentials).await {
                tracing::info!("Login rejected: {e}");
                error.set(Some(e.to_string()));
                loading.set(false);
            }
        });
    };

    rsx! {
        div {
            class: "auth-page",
            div {
                class: "auth-panel",

                h1 { class: "auth-title", "Welcome back" }
                p { class: "auth-subtitle", "Sign in to continue your recovery" }

                form {
                    onsubmit: handle_login,
                    class: "auth-form",

                    FormError { message: error() }

                    div {
                        Label { html_for: "login-email", "Email" }
                        Input {
                            id: "login-email",
                            r#type: "email",
                            placeholder: "you@example.com",
                            required: true,
                            value: email(),
                            oninput: move |evt: FormEvent| email.set(evt.value()),
                        }
                    }

                    div {
                        Label { html_for: "login-password", "Password" }
                        Input {
                            id: "login-password",
                            r#type: "password",
                            required: true,
                            value: password(),
                            oninput: move |evt: FormEvent| password.set(evt.value()),
                        }
                    }

                    Button {
                        variant: ButtonVariant::Primary,
                        r#type: "submit",
                        disabled: loading(),
                        if loading() { "Signing in..." } else { "Sign in" }
                    }
                }

                p {
                    class: "auth-footer",
                    "Don't have an account? "
                    Link { to: crate::Route::Signup {}, "Sign up" }
                }
            }
        }
    }
}
