//! Navigation requests issued by the core to the host router.

/// Views the core knows how to send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Login,
    Signup,
    Dashboard,
}

/// A single routing side effect, as delivered to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Push(Destination),
    Replace(Destination),
}

/// Routing collaborator. Implemented over the Dioxus router in the `ui` crate.
pub trait Navigator {
    /// Navigate, keeping the current entry in history.
    fn push(&self, to: Destination);

    /// Navigate, replacing the current history entry.
    fn replace(&self, to: Destination);

    /// Re-fetch server-derived data of the current route.
    fn refresh(&self);
}
