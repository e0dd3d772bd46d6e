//! Authentication context and hooks for the UI.
//!
//! [`AuthProvider`] owns the single [`AuthController`] of the application. It
//! must sit inside the router (the web app mounts it in the layout route) so
//! that `on_navigate` can reach the router's navigator.

use api::{AuthController, AuthState, Destination, HostedClient, Navigation, Navigator, StateCell};
use dioxus::prelude::*;

use crate::components::{Button, ButtonVariant};

/// Backend used by the application.
pub type Backend = HostedClient;

/// Controller type shared through context.
pub type AppAuth = AuthController<Backend, SignalCell, AppNavigator>;

/// Auth state stored in a signal. Writes after the owning scope is gone are
/// dropped.
#[derive(Clone, Copy)]
pub struct SignalCell(Signal<AuthState>);

impl StateCell for SignalCell {
    fn get(&self) -> AuthState {
        self.0
            .try_peek()
            .map(|state| AuthState::clone(&state))
            .unwrap_or_default()
    }

    fn update<R>(&self, f: impl FnOnce(&mut AuthState) -> R) -> Option<R> {
        let mut signal = self.0;
        let mut state = signal.try_write().ok()?;
        Some(f(&mut state))
    }
}

/// Generation counter bumped by [`Navigator::refresh`]. Views that hold
/// server-derived data read it to re-fetch.
#[derive(Clone, Copy)]
pub struct RefreshToken(Signal<u64>);

impl RefreshToken {
    pub fn generation(&self) -> u64 {
        (self.0)()
    }
}

/// [`Navigator`] that hands routing requests to the host router.
#[derive(Clone, Copy)]
pub struct AppNavigator {
    on_navigate: EventHandler<Navigation>,
    refresh: Signal<u64>,
}

impl AppNavigator {
    pub fn new(on_navigate: EventHandler<Navigation>, refresh: Signal<u64>) -> Self {
        Self {
            on_navigate,
            refresh,
        }
    }
}

impl Navigator for AppNavigator {
    fn push(&self, to: Destination) {
        self.on_navigate.call(Navigation::Push(to));
    }

    fn replace(&self, to: Destination) {
        self.on_navigate.call(Navigation::Replace(to));
    }

    fn refresh(&self) {
        let mut refresh = self.refresh;
        if let Ok(mut generation) = refresh.try_write() {
            *generation += 1;
        };
    }
}

/// Read the auth state. Reading subscribes the calling component.
///
/// # Panics
///
/// Outside an [`AuthProvider`] subtree.
pub fn use_auth() -> Signal<AuthState> {
    match try_use_context::<Signal<AuthState>>() {
        Some(state) => state,
        None => panic!("use_auth must be used within an AuthProvider"),
    }
}

/// The controller, for sign-in, sign-up and sign-out.
pub fn use_auth_controller() -> AppAuth {
    match try_use_context::<AppAuth>() {
        Some(controller) => controller,
        None => panic!("use_auth_controller must be used within an AuthProvider"),
    }
}

pub fn use_app_navigator() -> AppNavigator {
    match try_use_context::<AppNavigator>() {
        Some(navigator) => navigator,
        None => panic!("use_app_navigator must be used within an AuthProvider"),
    }
}

pub fn use_refresh_token() -> RefreshToken {
    match try_use_context::<RefreshToken>() {
        Some(token) => token,
        None => panic!("use_refresh_token must be used within an AuthProvider"),
    }
}

/// The backend client provided at the application root.
pub fn use_backend() -> Backend {
    use_context::<Backend>()
}

/// Provider component that manages authentication state.
///
/// On mount it subscribes to the backend's session changes and resolves the
/// initial session. Both tasks belong to this scope; unmounting drops them,
/// which releases the subscription, and detaches the controller.
#[component]
pub fn AuthProvider(on_navigate: EventHandler<Navigation>, children: Element) -> Element {
    let backend = use_backend();
    let state = use_signal(AuthState::default);
    let refresh = use_signal(|| 0u64);
    let navigator = AppNavigator::new(on_navigate, refresh);

    let controller = use_hook(move || {
        let controller = AuthController::new(backend, SignalCell(state), navigator);

        let changes = controller.subscribe();
        let runner = controller.clone();
        spawn(async move { runner.run(changes).await });

        let initializer = controller.clone();
        spawn(async move { initializer.initialize().await });

        controller
    });

    use_drop({
        let controller = controller.clone();
        move || {
            tracing::debug!("auth provider unmounted");
            controller.teardown();
        }
    });

    use_context_provider(|| state);
    use_context_provider(|| RefreshToken(refresh));
    use_context_provider(|| navigator);
    use_context_provider(|| controller);

    rsx! {
        {children}
    }
}

/// Button to sign the current user out.
#[component]
pub fn LogoutButton(
    #[props(default = "Sign out".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let auth = use_auth_controller();
    let mut busy = use_signal(|| false);

    let onclick = move |_: MouseEvent| {
        let auth = auth.clone();
        spawn(async move {
            busy.set(true);
            auth.sign_out().await;
            busy.set(false);
        });
    };

    rsx! {
        Button {
            variant: ButtonVariant::Outline,
            class,
            disabled: busy(),
            onclick,
            "{label}"
        }
    }
}
