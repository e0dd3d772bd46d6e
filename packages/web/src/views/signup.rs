//! Sign-up page: account credentials plus the baseline health profile.

use api::flows::{signup, SignupForm};
use dioxus::prelude::*;
use store::{Gender, Language, LanguageGroup};
use ui::components::{Button, ButtonVariant, FormError, Input, Label};
use ui::{use_auth_controller, use_submissions, GuestOnly};

/// Sign-up page component.
#[component]
pub fn Signup() -> Element {
    rsx! {
        GuestOnly { SignupFormView {} }
    }
}

#[component]
fn SignupFormView() -> Element {
    let auth = use_auth_controller();
    let submissions = use_submissions();
    let mut form = use_signal(SignupForm::default);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let handle_signup = move |evt: FormEvent| {
        evt.prevent_default();
        let auth = auth.clone();
        let submission = submissions.begin();
        spawn(async move {
            // Keeps the guard from redirecting until the profile writes are done.
            let _submission = submission;
            error.set(None);
            loading.set(true);

            let submitted = form();
            match signup(&auth, &submitted).await {
                Ok(report) => {
                    if !report.failures.is_empty() {
                        tracing::warn!(
                            failures = report.failures.len(),
                            "Account created with incomplete profile"
                        );
                    }
                }
                Err(e) => {
                    error.set(Some(e.to_string()));
                    loading.set(false);
                }
            }
        });
    };

    let current = form();

    rsx! {
        div {
            class: "auth-page",
            div {
                class: "auth-panel wide",

                h1 { class: "auth-title", "Create your account" }
                p { class: "auth-subtitle", "Tell us a little about yourself to personalize your plan" }

                form {
                    onsubmit: handle_signup,
                    class: "auth-form",

                    FormError { message: error() }

                    div {
                        class: "field-grid",

                        div {
                            Label { html_for: "full-name", "Full name" }
                            Input {
                                id: "full-name",
                                name: "fullName",
                                placeholder: "John Doe",
                                required: true,
                                value: current.full_name.clone(),
                                oninput: move |evt: FormEvent| form.write().full_name = evt.value(),
                            }
                        }

                        div {
                            Label { html_for: "email", "Email" }
                            Input {
                                id: "email",
                                name: "email",
                                r#type: "email",
                                placeholder: "you@example.com",
                                required: true,
                                value: current.email.clone(),
                                oninput: move |evt: FormEvent| form.write().email = evt.value(),
                            }
                        }

                        div {
                            Label { html_for: "password", "Password" }
                            Input {
                                id: "password",
                                name: "password",
                                r#type: "password",
                                placeholder: "Strong password",
                                required: true,
                                value: current.password.clone(),
                                oninput: move |evt: FormEvent| form.write().password = evt.value(),
                            }
                        }

                        div {
                            Label { html_for: "age", "Age" }
                            Input {
                                id: "age",
                                name: "age",
                                r#type: "number",
                                required: true,
                                value: current.age.clone(),
                                oninput: move |evt: FormEvent| form.write().age = evt.value(),
                            }
                        }

                        div {
                            Label { html_for: "gender", "Gender" }
                            select {
                                id: "gender",
                                name: "gender",
                                class: "select",
                                value: "{current.gender}",
                                onchange: move |evt: FormEvent| form.write().gender = evt.value(),
                                for gender in Gender::ALL {
                                    option { value: gender.as_str(), {gender.label()} }
                                }
                            }
                        }

                        div {
                            Label { html_for: "language", "Preferred language" }
                            select {
                                id: "language",
                                name: "language",
                                class: "select",
                                value: "{current.language}",
                                onchange: move |evt: FormEvent| form.write().language = evt.value(),
                                for group in LanguageGroup::ALL {
                                    optgroup {
                                        label: group.label(),
                                        for language in Language::in_group(group) {
                                            option { value: language.as_str(), {language.label()} }
                                        }
                                    }
                                }
                            }
                        }

                        div {
                            Label { html_for: "height", "Height (cm)" }
                            Input {
                                id: "height",
                                name: "height",
                                r#type: "number",
                                required: true,
                                value: current.height_cm.clone(),
                                oninput: move |evt: FormEvent| form.write().height_cm = evt.value(),
                            }
                        }

                        div {
                            Label { html_for: "weight", "Weight (kg)" }
                            Input {
                                id: "weight",
                                name: "weight",
                                r#type: "number",
                                required: true,
                                value: current.weight_kg.clone(),
                                oninput: move |evt: FormEvent| form.write().weight_kg = evt.value(),
                            }
                        }
                    }

                    Button {
                        variant: ButtonVariant::Primary,
                        r#type: "submit",
                        disabled: loading(),
                        if loading() { "Creating account..." } else { "Create account" }
                    }
                }

                p {
                    class: "auth-footer",
                    "Already have an account? "
                    Link { to: crate::Route::Login {}, "Sign in" }
                }
            }
        }
    }
}
