use std::env;

use tracing::warn;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Runtime settings read from the environment.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub host: String,
    pub port: u16,
    /// `None` leaves the copy client unconfigured; every call then degrades
    /// to the placeholder description.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base: String,
}

impl Default for StudioConfig {
    fn default() -> Self {
        StudioConfig {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_owned(),
            gemini_api_base: DEFAULT_GEMINI_API_BASE.to_owned(),
        }
    }
}

impl StudioConfig {
    /// Builds the config from process environment variables.
    ///
    /// - `GEMINI_API_KEY` (or `GOOGLE_API_KEY`)
    /// - `GEMINI_MODEL`, `GEMINI_API_BASE`
    /// - `STUDIO_HOST`, `PORT`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let defaults = StudioConfig::default();

        let port = match get("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(value = %raw, default = DEFAULT_PORT, "ignoring unparseable PORT");
                DEFAULT_PORT
            }),
            None => defaults.port,
        };

        StudioConfig {
            host: get("STUDIO_HOST").unwrap_or(defaults.host),
            port,
            gemini_api_key: get("GEMINI_API_KEY").or_else(|| get("GOOGLE_API_KEY")),
            gemini_model: get("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_api_base: get("GEMINI_API_BASE")
                .map(|base| base.trim_end_matches('/').to_owned())
                .unwrap_or(defaults.gemini_api_base),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> StudioConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        StudioConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = config_from(&[]);
        assert_eq!(config.port, 3001);
        assert_eq!(config.bind_addr(), "0.0.0.0:3001");
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn reads_overrides_and_falls_back_on_bad_port() {
        let config = config_from(&[
            ("PORT", "not-a-port"),
            ("GOOGLE_API_KEY", " key-123 "),
            ("GEMINI_API_BASE", "http://localhost:9000/v1/"),
            ("STUDIO_HOST", "127.0.0.1"),
        ]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.gemini_api_key.as_deref(), Some("key-123"));
        assert_eq!(config.gemini_api_base, "http://localhost:9000/v1");
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn blank_key_counts_as_unset() {
        let config = config_from(&[("GEMINI_API_KEY", "   "), ("PORT", "8080")]);
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.port, 8080);
    }
}
