//! Browser persistence of the current session.
//!
//! On the web platform the session survives reloads in `localStorage`. Storage
//! errors (private mode, quota, corrupted JSON) degrade to "no stored session".
//! Native builds keep the session in memory only.

#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "rehabflow.auth.session";

#[cfg(target_arch = "wasm32")]
fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

#[cfg(target_arch = "wasm32")]
pub(super) fn load() -> Option<store::Session> {
    let raw = storage()?.get_item(STORAGE_KEY).ok().flatten()?;
    match serde_json::from_str(&raw) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::warn!("Discarding unreadable stored session: {e}");
            None
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub(super) fn save(session: Option<&store::Session>) {
    let Some(storage) = storage() else {
        return;
    };
    let result = match session.map(serde_json::to_string) {
        Some(Ok(raw)) => storage.set_item(STORAGE_KEY, &raw),
        Some(Err(e)) => {
            tracing::warn!("Failed to serialize session: {e}");
            return;
        }
        None => storage.remove_item(STORAGE_KEY),
    };
    if result.is_err() {
        tracing::warn!("Failed to update stored session");
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub(super) fn load() -> Option<store::Session> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub(super) fn save(_session: Option<&store::Session>) {}
