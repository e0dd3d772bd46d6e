//! Account creation with best-effort profile enrichment.
//!
//! The account is the durable outcome. The profile and baseline writes that
//! follow it may fail (row policies, network); such failures are logged, listed
//! in the [`SignupReport`] and never undo the account or block navigation.

use serde_json::{json, Value};
use store::{
    AuthError, AuthEvent, Collection, Gender, Language, RecordStore, Session, SessionStore,
    StoreError, User,
};

use super::{into_row, is_email, FlowError, ValidationError};
use crate::auth::{validate_password, AuthController, StateCell};
use crate::navigation::{Destination, Navigator};

/// Lifestyle answers are not asked at sign-up.
const LIFESTYLE_DEFAULT: &str = "never";

/// Raw sign-up form contents, as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub age: String,
    pub gender: String,
    pub height_cm: String,
    pub weight_kg: String,
    pub language: String,
}

impl Default for SignupForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            full_name: String::new(),
            age: String::new(),
            gender: Gender::default().as_str().to_string(),
            height_cm: String::new(),
            weight_kg: String::new(),
            language: Language::default().as_str().to_string(),
        }
    }
}

/// A validated sign-up.
#[derive(Debug, Clone, PartialEq)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub age: u32,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub language: Language,
}

fn number_in(raw: &str, min: f64, max: f64) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && (min..=max).contains(v))
}

impl SignupForm {
    /// Check every field. The password policy is checked first.
    pub fn validate(&self) -> Result<SignupRequest, ValidationError> {
        if !validate_password(&self.password) {
            return Err(ValidationError::WeakPassword);
        }
        let email = self.email.trim();
        if !is_email(email) {
            return Err(ValidationError::Email);
        }
        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            return Err(ValidationError::FullName);
        }
        let age = self
            .age
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|age| (1..=120).contains(age))
            .ok_or(ValidationError::Age)?;
        let gender = self.gender.parse::<Gender>().map_err(ValidationError::Gender)?;
        let height_cm = number_in(&self.height_cm, 50.0, 300.0).ok_or(ValidationError::Height)?;
        let weight_kg = number_in(&self.weight_kg, 20.0, 500.0).ok_or(ValidationError::Weight)?;
        let language = self
            .language
            .parse::<Language>()
            .map_err(ValidationError::Language)?;

        Ok(SignupRequest {
            email: email.to_string(),
            password: self.password.clone(),
            full_name: full_name.to_string(),
            age,
            gender,
            height_cm,
            weight_kg,
            language,
        })
    }
}

/// Write attempted after the account exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentStep {
    ProfileUpdate,
    ProfileUpsert,
    BaselineInsert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentFailure {
    pub step: EnrichmentStep,
    pub error: StoreError,
}

/// Outcome of a completed sign-up.
#[derive(Debug, Clone, PartialEq)]
pub struct SignupReport {
    pub user: User,
    /// `None` when the service waits for email confirmation.
    pub session: Option<Session>,
    pub profile_saved: bool,
    pub baseline_saved: bool,
    pub failures: Vec<EnrichmentFailure>,
}

impl SignupReport {
    fn record(&mut self, step: EnrichmentStep, error: StoreError) {
        self.failures.push(EnrichmentFailure { step, error });
    }

    pub fn failed(&self, step: EnrichmentStep) -> bool {
        self.failures.iter().any(|failure| failure.step == step)
    }
}

/// Whole numbers are written as integers, matching integer columns.
fn measurement(value: f64) -> Value {
    if value.fract() == 0.0 {
        json!(value as i64)
    } else {
        json!(value)
    }
}

/// Create the account, enrich it, then refresh and go to the dashboard.
pub async fn signup<S, C, N>(
    auth: &AuthController<S, C, N>,
    form: &SignupForm,
) -> Result<SignupReport, FlowError>
where
    S: SessionStore + RecordStore,
    C: StateCell,
    N: Navigator,
{
    let request = form.validate()?;
    let store = auth.store();

    let metadata = into_row(json!({
        "full_name": request.full_name,
        "language": request.language.as_str(),
    }));
    let created = store
        .sign_up(&request.email, &request.password, metadata)
        .await?;
    let user = created
        .user
        .ok_or_else(|| AuthError::new("No user created"))?;
    tracing::info!(user_id = %user.id, "account created");

    if let Some(session) = &created.session {
        auth.handle_change(AuthEvent::SignedIn, Some(session.clone()));
    }

    let mut report = SignupReport {
        user,
        session: created.session,
        profile_saved: false,
        baseline_saved: false,
        failures: Vec::new(),
    };

    // Profile: update the row created with the account, upsert if that fails.
    let profile = json!({
        "full_name": request.full_name,
        "language": request.language.as_str(),
    });
    match store
        .update(Collection::Profiles, &report.user.id, into_row(profile.clone()))
        .await
    {
        Ok(()) => report.profile_saved = true,
        Err(e) => {
            tracing::warn!("Profile update failed, attempting upsert: {e}");
            report.record(EnrichmentStep::ProfileUpdate, e);
            let mut fields = into_row(profile);
            fields.insert("id".into(), Value::String(report.user.id.clone()));
            match store.upsert_by_identity(Collection::Profiles, fields).await {
                Ok(()) => report.profile_saved = true,
                Err(e) => {
                    tracing::error!("Profile upsert failed: {e}");
                    report.record(EnrichmentStep::ProfileUpsert, e);
                }
            }
        }
    }

    let baseline = into_row(json!({
        "user_id": report.user.id,
        "age": request.age,
        "gender": request.gender.as_str(),
        "height_cm": measurement(request.height_cm),
        "weight_kg": measurement(request.weight_kg),
        "gym_frequency": LIFESTYLE_DEFAULT,
        "alcohol_usage": LIFESTYLE_DEFAULT,
        "smoking_usage": LIFESTYLE_DEFAULT,
        "drug_usage": LIFESTYLE_DEFAULT,
    }));
    match store.insert(Collection::BaselineProfiles, baseline).await {
        Ok(()) => report.baseline_saved = true,
        Err(e) => {
            tracing::error!("Baseline profile creation failed: {e}");
            report.record(EnrichmentStep::BaselineInsert, e);
        }
    }

    auth.navigator().refresh();
    auth.navigator().push(Destination::Dashboard);
    Ok(report)
}
