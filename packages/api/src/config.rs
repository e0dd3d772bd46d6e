//! Hosted backend configuration from environment variables.

/// Base URL of the hosted backend project, e.g. `https://abc.supabase.co`.
pub const BACKEND_URL_VAR: &str = "REHABFLOW_BACKEND_URL";
/// Public (anon) API key sent with every request.
pub const BACKEND_ANON_KEY_VAR: &str = "REHABFLOW_BACKEND_ANON_KEY";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("{var} must be an http(s) URL, got {value:?}")]
    InvalidUrl { var: &'static str, value: String },
}

/// Where the hosted backend lives and how to identify this application to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
}

impl BackendConfig {
    pub fn new(url: &str, anon_key: &str) -> Result<Self, ConfigError> {
        let url = url.trim().trim_end_matches('/');
        if url.is_empty() {
            return Err(ConfigError::Missing(BACKEND_URL_VAR));
        }
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::InvalidUrl {
                var: BACKEND_URL_VAR,
                value: url.to_string(),
            });
        }
        let anon_key = anon_key.trim();
        if anon_key.is_empty() {
            return Err(ConfigError::Missing(BACKEND_ANON_KEY_VAR));
        }
        Ok(Self {
            url: url.to_string(),
            anon_key: anon_key.to_string(),
        })
    }

    /// Build from any variable source (environment, compile-time constants, tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = lookup(BACKEND_URL_VAR).ok_or(ConfigError::Missing(BACKEND_URL_VAR))?;
        let anon_key =
            lookup(BACKEND_ANON_KEY_VAR).ok_or(ConfigError::Missing(BACKEND_ANON_KEY_VAR))?;
        Self::new(&url, &anon_key)
    }

    /// Read the process environment, loading `.env` first if present.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load the configuration for the current platform.
    ///
    /// Browser builds have no process environment, so the values are captured from
    /// the build environment instead.
    pub fn load() -> Result<Self, ConfigError> {
        #[cfg(target_arch = "wasm32")]
        {
            Self::from_lookup(|var| match var {
                BACKEND_URL_VAR => option_env!("REHABFLOW_BACKEND_URL").map(str::to_string),
                BACKEND_ANON_KEY_VAR => {
                    option_env!("REHABFLOW_BACKEND_ANON_KEY").map(str::to_string)
                }
                _ => None,
            })
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            Self::from_env()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_trims_trailing_slash() {
        let config = BackendConfig::from_lookup(lookup(&[
            (BACKEND_URL_VAR, "https://demo.supabase.co/"),
            (BACKEND_ANON_KEY_VAR, "anon"),
        ]))
        .unwrap();
        assert_eq!(config.url, "https://demo.supabase.co");
        assert_eq!(config.anon_key, "anon");
    }

    #[test]
    fn test_missing_values() {
        assert_eq!(
            BackendConfig::from_lookup(lookup(&[])),
            Err(ConfigError::Missing(BACKEND_URL_VAR))
        );
        assert_eq!(
            BackendConfig::from_lookup(lookup(&[(BACKEND_URL_VAR, "https://x.co")])),
            Err(ConfigError::Missing(BACKEND_ANON_KEY_VAR))
        );
        assert_eq!(
            BackendConfig::new("https://x.co", "   "),
            Err(ConfigError::Missing(BACKEND_ANON_KEY_VAR))
        );
    }

    #[test]
    fn test_rejects_non_http_url() {
        let err = BackendConfig::new("ftp://x.co", "anon").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }
}
