//! Route guards over the auth state.

use api::auth::{guest_only, protect};
use api::{GuardDecision, Navigator};
use dioxus::prelude::*;

use crate::auth::{use_app_navigator, use_auth};

/// Form submissions running under a [`GuestOnly`] guard. While any is in flight
/// the guard holds its redirect.
#[derive(Clone, Copy)]
pub struct Submissions(Signal<u32>);

impl Submissions {
    /// Mark a submission as started. It ends when the returned guard drops, so
    /// move the guard into the task that runs the flow.
    pub fn begin(self) -> SubmissionGuard {
        let mut count = self.0;
        if let Ok(mut count) = count.try_write() {
            *count += 1;
        }
        SubmissionGuard(self.0)
    }

    pub fn in_flight(&self) -> bool {
        (self.0)() > 0
    }
}

pub struct SubmissionGuard(Signal<u32>);

impl Drop for SubmissionGuard {
    fn drop(&mut self) {
        if let Ok(mut count) = self.0.try_write() {
            *count = count.saturating_sub(1);
        };
    }
}

/// Submission tracker of the enclosing [`GuestOnly`].
///
/// # Panics
///
/// Outside a [`GuestOnly`] subtree.
pub fn use_submissions() -> Submissions {
    match try_use_context::<Submissions>() {
        Some(submissions) => submissions,
        None => panic!("use_submissions must be used within a GuestOnly"),
    }
}

/// Neutral placeholder shown while a guard has nothing to render.
#[component]
pub fn LoadingPlaceholder() -> Element {
    rsx! {
        div {
            class: "auth-loading",
            div { class: "spinner" }
        }
    }
}

#[component]
fn Guarded(decision: Memo<GuardDecision>, children: Element) -> Element {
    let navigator = use_app_navigator();

    // Re-evaluated on every auth change, not only at mount.
    use_effect(move || {
        if let GuardDecision::Redirect(to) = decision() {
            navigator.replace(to);
        }
    });

    match decision() {
        GuardDecision::Render => rsx! { {children} },
        GuardDecision::Loading | GuardDecision::Redirect(_) => rsx! { LoadingPlaceholder {} },
    }
}

/// Renders `children` only for a signed-in user; anonymous viewers are sent to
/// the login view.
#[component]
pub fn ProtectedRoute(children: Element) -> Element {
    let auth = use_auth();
    let decision = use_memo(move || protect(&auth.read()));
    rsx! {
        Guarded { decision, {children} }
    }
}

/// Renders `children` unless someone is signed in, who is sent on to the
/// dashboard once no submission is in flight.
#[component]
pub fn GuestOnly(children: Element) -> Element {
    let auth = use_auth();
    let count = use_signal(|| 0u32);
    let submissions = use_context_provider(|| Submissions(count));
    let decision = use_memo(move || guest_only(&auth.read(), submissions.in_flight()));
    rsx! {
        Guarded { decision, {children} }
    }
}
