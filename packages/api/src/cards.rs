//! Values derived for the dashboard cards.

use chrono::NaiveDate;
use store::{BaselineProfile, InjuryAssessment, Profile, User};

const NAME_FALLBACK: &str = "Patient";
const CAUSE_FALLBACK: &str = "Assessment";
const NO_VALUE: &str = "--";

/// Name used in the greeting: profile name, then sign-up metadata, then a
/// generic fallback.
pub fn welcome_name<'a>(profile: Option<&'a Profile>, user: Option<&'a User>) -> &'a str {
    profile
        .and_then(|p| p.full_name.as_deref())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .or_else(|| user.and_then(User::full_name))
        .unwrap_or(NAME_FALLBACK)
}

/// Greeting date, e.g. "Monday, March 3".
pub fn welcome_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d").to_string()
}

/// Body-mass index. `None` unless both measurements are present and non-zero.
pub fn bmi(height_cm: Option<f64>, weight_kg: Option<f64>) -> Option<f64> {
    let height_m = height_cm.filter(|h| *h > 0.0)? / 100.0;
    let weight = weight_kg.filter(|w| *w > 0.0)?;
    Some(weight / (height_m * height_m))
}

pub fn format_bmi(baseline: &BaselineProfile) -> String {
    bmi(baseline.height_cm, baseline.weight_kg)
        .map(|value| format!("{value:.1}"))
        .unwrap_or_else(|| NO_VALUE.to_string())
}

/// Display a measurement without a trailing `.0`.
pub fn format_measurement(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{v:.0}"),
        Some(v) => v.to_string(),
        None => NO_VALUE.to_string(),
    }
}

/// Pain severity on the 0..=10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PainBand {
    Mild,
    Moderate,
    Severe,
}

impl PainBand {
    pub fn from_level(level: u8) -> Self {
        match level {
            0..=3 => PainBand::Mild,
            4..=6 => PainBand::Moderate,
            _ => PainBand::Severe,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PainBand::Mild => "Mild",
            PainBand::Moderate => "Moderate",
            PainBand::Severe => "Severe",
        }
    }

    /// CSS modifier class.
    pub fn class(self) -> &'static str {
        match self {
            PainBand::Mild => "pain-mild",
            PainBand::Moderate => "pain-moderate",
            PainBand::Severe => "pain-severe",
        }
    }
}

/// `lower_back` -> `lower back`.
pub fn location_label(location: &str) -> String {
    location.replace('_', " ")
}

pub fn cause_label(assessment: &InjuryAssessment) -> &str {
    assessment
        .pain_cause
        .as_deref()
        .filter(|cause| !cause.trim().is_empty())
        .unwrap_or(CAUSE_FALLBACK)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GamificationStats {
    pub points: i64,
    pub streak: i64,
}

impl GamificationStats {
    pub fn from_profile(profile: Option<&Profile>) -> Self {
        Self {
            points: profile.and_then(|p| p.total_points).unwrap_or(0),
            streak: profile.and_then(|p| p.current_streak).unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use store::Row;

    use super::*;

    fn profile(name: Option<&str>) -> Profile {
        Profile {
            id: "u1".into(),
            full_name: name.map(str::to_string),
            language: None,
            total_points: Some(120),
            current_streak: None,
            created_at: None,
        }
    }

    fn baseline(height_cm: Option<f64>, weight_kg: Option<f64>) -> BaselineProfile {
        BaselineProfile {
            user_id: "u1".into(),
            age: Some(30),
            gender: None,
            height_cm,
            weight_kg,
            gym_frequency: None,
            alcohol_usage: None,
            smoking_usage: None,
            drug_usage: None,
            created_at: None,
        }
    }

    #[test]
    fn test_welcome_name() {
        let mut metadata = Row::new();
        metadata.insert("full_name".into(), json!("Meta Name"));
        let user = User {
            id: "u1".into(),
            email: None,
            user_metadata: metadata,
        };

        assert_eq!(welcome_name(Some(&profile(Some("Pat"))), Some(&user)), "Pat");
        assert_eq!(welcome_name(Some(&profile(Some("  "))), Some(&user)), "Meta Name");
        assert_eq!(welcome_name(None, Some(&user)), "Meta Name");
        assert_eq!(welcome_name(Some(&profile(None)), None), "Patient");
        assert_eq!(welcome_name(None, None), "Patient");
    }

    #[test]
    fn test_welcome_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        assert_eq!(welcome_date(date), "Monday, March 3");
    }

    #[test]
    fn test_bmi() {
        assert_eq!(format_bmi(&baseline(Some(175.0), Some(70.0))), "22.9");
        assert_eq!(format_bmi(&baseline(Some(180.0), Some(81.0))), "25.0");
        assert_eq!(format_bmi(&baseline(None, Some(70.0))), "--");
        assert_eq!(format_bmi(&baseline(Some(175.0), None)), "--");
        assert_eq!(format_bmi(&baseline(Some(0.0), Some(70.0))), "--");
        assert_eq!(format_bmi(&baseline(Some(175.0), Some(0.0))), "--");
    }

    #[test]
    fn test_format_measurement() {
        assert_eq!(format_measurement(Some(175.0)), "175");
        assert_eq!(format_measurement(Some(70.5)), "70.5");
        assert_eq!(format_measurement(None), "--");
    }

    #[test]
    fn test_pain_bands() {
        assert_eq!(PainBand::from_level(0), PainBand::Mild);
        assert_eq!(PainBand::from_level(3), PainBand::Mild);
        assert_eq!(PainBand::from_level(4), PainBand::Moderate);
        assert_eq!(PainBand::from_level(6), PainBand::Moderate);
        assert_eq!(PainBand::from_level(7), PainBand::Severe);
        assert_eq!(PainBand::from_level(10).label(), "Severe");
    }

    #[test]
    fn test_assessment_labels() {
        assert_eq!(location_label("lower_back"), "lower back");
        assert_eq!(location_label("left_upper_arm"), "left upper arm");
        assert_eq!(location_label("neck"), "neck");

        let mut assessment = InjuryAssessment {
            user_id: "u1".into(),
            pain_location: "neck".into(),
            pain_level: 2,
            pain_cause: None,
            created_at: None,
        };
        assert_eq!(cause_label(&assessment), "Assessment");
        assessment.pain_cause = Some("sports".into());
        assert_eq!(cause_label(&assessment), "sports");
    }

    #[test]
    fn test_gamification_defaults() {
        assert_eq!(
            GamificationStats::from_profile(None),
            GamificationStats { points: 0, streak: 0 }
        );
        assert_eq!(
            GamificationStats::from_profile(Some(&profile(None))),
            GamificationStats { points: 120, streak: 0 }
        );
    }
}
