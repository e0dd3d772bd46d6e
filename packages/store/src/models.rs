//! # Domain models shared by the hosted backend and the in-memory store
//!
//! Everything here is `Serialize + Deserialize` because it crosses the wire to the
//! hosted auth API (sessions, users) or the row API (profiles, baselines,
//! assessments).
//!
//! ## Identity
//!
//! | Type | Represents |
//! |------|-----------|
//! | [`User`] | Identity record issued by the auth service: `id`, `email` and free-form `user_metadata` (display name, language). |
//! | [`Session`] | Token bundle for a signed-in [`User`]. `expires_at` is unix seconds. |
//! | [`AuthEvent`] | Kind of change announced on the session change stream. |
//!
//! ## Records
//!
//! | Type | Table | Owner column |
//! |------|-------|--------------|
//! | [`Profile`] | `profiles` | `id` |
//! | [`BaselineProfile`] | `baseline_profiles` | `user_id` |
//! | [`InjuryAssessment`] | `injury_assessments` | `user_id` |
//!
//! Record fields are optional wherever the row API may hand back `null`, so a
//! half-filled row still decodes and the cards can fall back per field.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A raw row as exchanged with the record store.
pub type Row = serde_json::Map<String, Value>;

/// Identity record owned by the auth service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Row,
}

impl User {
    /// `full_name` from the metadata written at sign-up, if any.
    pub fn full_name(&self) -> Option<&str> {
        self.user_metadata
            .get("full_name")
            .and_then(Value::as_str)
            .filter(|name| !name.trim().is_empty())
    }
}

/// Server-issued proof of an authenticated identity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds) after which the access token is rejected.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: User,
}

impl Session {
    /// True when the access token expires within `margin_secs` of `now`.
    /// Sessions without an expiry never count as expiring.
    pub fn expires_within(&self, now: i64, margin_secs: i64) -> bool {
        self.expires_at
            .map(|expires_at| expires_at - now <= margin_secs)
            .unwrap_or(false)
    }
}

/// Kind of change emitted on the session change stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEvent {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
}

impl fmt::Display for AuthEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthEvent::InitialSession => "INITIAL_SESSION",
            AuthEvent::SignedIn => "SIGNED_IN",
            AuthEvent::SignedOut => "SIGNED_OUT",
            AuthEvent::TokenRefreshed => "TOKEN_REFRESHED",
            AuthEvent::UserUpdated => "USER_UPDATED",
        };
        f.write_str(name)
    }
}

/// Row collections read and written by the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Profiles,
    BaselineProfiles,
    InjuryAssessments,
}

impl Collection {
    pub fn table(self) -> &'static str {
        match self {
            Collection::Profiles => "profiles",
            Collection::BaselineProfiles => "baseline_profiles",
            Collection::InjuryAssessments => "injury_assessments",
        }
    }

    /// Column holding the owning user's id. Profiles share the user's id as
    /// their primary key; the other tables carry a `user_id` foreign key.
    pub fn owner_column(self) -> &'static str {
        match self {
            Collection::Profiles => "id",
            Collection::BaselineProfiles | Collection::InjuryAssessments => "user_id",
        }
    }
}

/// Gender options offered at sign-up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|gender| gender.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Grouping used by the language picker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LanguageGroup {
    Common,
    Indian,
    Global,
}

impl LanguageGroup {
    pub const ALL: [LanguageGroup; 3] = [
        LanguageGroup::Common,
        LanguageGroup::Indian,
        LanguageGroup::Global,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LanguageGroup::Common => "Common",
            LanguageGroup::Indian => "Indian Languages",
            LanguageGroup::Global => "Global Languages",
        }
    }
}

macro_rules! languages {
    ($($variant:ident => $code:literal, $label:literal, $group:ident;)+) => {
        /// Supported interface and coaching languages.
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum Language {
            #[default]
            $($variant,)+
        }

        impl Language {
            pub const ALL: &'static [Language] = &[$(Language::$variant,)+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Language::$variant => $code,)+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $(Language::$variant => $label,)+
                }
            }

            pub fn group(self) -> LanguageGroup {
                match self {
                    $(Language::$variant => LanguageGroup::$group,)+
                }
            }
        }
    };
}

languages! {
    English => "english", "English", Common;
    Hindi => "hindi", "Hindi", Common;
    Bengali => "bengali", "Bengali", Indian;
    Telugu => "telugu", "Telugu", Indian;
    Marathi => "marathi", "Marathi", Indian;
    Tamil => "tamil", "Tamil", Indian;
    Urdu => "urdu", "Urdu", Indian;
    Gujarati => "gujarati", "Gujarati", Indian;
    Kannada => "kannada", "Kannada", Indian;
    Malayalam => "malayalam", "Malayalam", Indian;
    Punjabi => "punjabi", "Punjabi", Indian;
    Odia => "odia", "Odia", Indian;
    Assamese => "assamese", "Assamese", Indian;
    Maithili => "maithili", "Maithili", Indian;
    Sanskrit => "sanskrit", "Sanskrit", Indian;
    Spanish => "spanish", "Spanish", Global;
    French => "french", "French", Global;
    German => "german", "German", Global;
    Chinese => "chinese", "Chinese", Global;
    Japanese => "japanese", "Japanese", Global;
    Russian => "russian", "Russian", Global;
    Portuguese => "portuguese", "Portuguese", Global;
    Arabic => "arabic", "Arabic", Global;
}

impl Language {
    /// Languages belonging to `group`, in picker order.
    pub fn in_group(group: LanguageGroup) -> impl Iterator<Item = Language> {
        Language::ALL
            .iter()
            .copied()
            .filter(move |language| language.group() == group)
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .iter()
            .copied()
            .find(|language| language.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Per-user profile row (`profiles`), including gamification counters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub total_points: Option<i64>,
    #[serde(default)]
    pub current_streak: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Self-reported physical metrics captured at sign-up (`baseline_profiles`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaselineProfile {
    pub user_id: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub gym_frequency: Option<String>,
    #[serde(default)]
    pub alcohol_usage: Option<String>,
    #[serde(default)]
    pub smoking_usage: Option<String>,
    #[serde(default)]
    pub drug_usage: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A user-submitted injury description (`injury_assessments`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InjuryAssessment {
    pub user_id: String,
    #[serde(default)]
    pub pain_location: String,
    #[serde(default)]
    pub pain_level: u8,
    #[serde(default)]
    pub pain_cause: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_language_groups_cover_every_language() {
        let grouped: usize = LanguageGroup::ALL
            .iter()
            .map(|group| Language::in_group(*group).count())
            .sum();
        assert_eq!(grouped, Language::ALL.len());
        assert_eq!(Language::ALL.len(), 23);
        assert_eq!(Language::default(), Language::English);
        assert_eq!("tamil".parse::<Language>(), Ok(Language::Tamil));
        assert!("klingon".parse::<Language>().is_err());
    }

    #[test]
    fn test_session_expiry_margin() {
        let session = Session {
            access_token: "a".into(),
            refresh_token: "r".into(),
            expires_at: Some(1_000),
            user: User {
                id: "u1".into(),
                email: Some("a@b.com".into()),
                user_metadata: Row::new(),
            },
        };
        assert!(!session.expires_within(900, 30));
        assert!(session.expires_within(980, 30));
        assert!(session.expires_within(2_000, 30));

        let open_ended = Session {
            expires_at: None,
            ..session
        };
        assert!(!open_ended.expires_within(i64::MAX, 30));
    }

    #[test]
    fn test_baseline_decodes_with_nulls() {
        let row = json!({
            "user_id": "u1",
            "age": 30,
            "gender": "female",
            "height_cm": 175,
            "weight_kg": null,
            "created_at": "2025-01-02T03:04:05Z"
        });
        let baseline: BaselineProfile = serde_json::from_value(row).unwrap();
        assert_eq!(baseline.age, Some(30));
        assert_eq!(baseline.gender, Some(Gender::Female));
        assert_eq!(baseline.height_cm, Some(175.0));
        assert_eq!(baseline.weight_kg, None);
        assert!(baseline.created_at.is_some());
    }

    #[test]
    fn test_user_full_name_ignores_blank() {
        let mut user = User {
            id: "u1".into(),
            email: Some("pat@example.com".into()),
            user_metadata: Row::new(),
        };
        assert_eq!(user.full_name(), None);
        user.user_metadata.insert("full_name".into(), json!("  "));
        assert_eq!(user.full_name(), None);
        user.user_metadata
            .insert("full_name".into(), json!("Pat Doe"));
        assert_eq!(user.full_name(), Some("Pat Doe"));
    }
}
