//! Dashboard data: the latest profile, baseline and assessment of one user.

use serde::de::DeserializeOwned;
use serde_json::Value;
use store::{BaselineProfile, Collection, InjuryAssessment, Profile, RecordStore};

/// The three records shown on the dashboard. Each is absent when missing or
/// when its lookup failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    pub profile: Option<Profile>,
    pub baseline: Option<BaselineProfile>,
    pub assessment: Option<InjuryAssessment>,
}

/// What the dashboard view renders: one loading flag for the whole batch.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub loading: bool,
    pub data: DashboardData,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            loading: true,
            data: DashboardData::default(),
        }
    }
}

async fn latest<T: DeserializeOwned>(
    store: &impl RecordStore,
    collection: Collection,
    user_id: &str,
) -> Option<T> {
    let row = match store.select_latest_by_user(collection, user_id).await {
        Ok(row) => row?,
        Err(e) => {
            tracing::error!(table = collection.table(), "Dashboard lookup failed: {e}");
            return None;
        }
    };
    match serde_json::from_value(Value::Object(row)) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::error!(table = collection.table(), "Unreadable dashboard row: {e}");
            None
        }
    }
}

/// Run the three lookups concurrently and wait for all of them to settle.
pub async fn load_dashboard(store: &impl RecordStore, user_id: &str) -> DashboardData {
    let (profile, baseline, assessment) = futures::join!(
        latest(store, Collection::Profiles, user_id),
        latest(store, Collection::BaselineProfiles, user_id),
        latest(store, Collection::InjuryAssessments, user_id),
    );
    DashboardData {
        profile,
        baseline,
        assessment,
    }
}

/// [`load_dashboard`], publishing the loading state before and the settled
/// result after.
pub async fn load_dashboard_into(
    store: &impl RecordStore,
    user_id: &str,
    mut publish: impl FnMut(DashboardState),
) {
    publish(DashboardState::default());
    let data = load_dashboard(store, user_id).await;
    publish(DashboardState {
        loading: false,
        data,
    });
}
