use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for an OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl LlmConfig {
    /// Read the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingApiKey` when neither `STUDY_AI_API_KEY`
    /// nor `OPENAI_API_KEY` is set, or `ConfigError::InvalidTimeout` for a
    /// malformed `STUDY_AI_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`LlmConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = non_blank("STUDY_AI_API_KEY")
            .or_else(|| non_blank("OPENAI_API_KEY"))
            .ok_or(ConfigError::MissingApiKey)?;
        let base_url = non_blank("STUDY_AI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let model = non_blank("STUDY_AI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into());
        let timeout = match non_blank("STUDY_AI_TIMEOUT_SECS") {
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().ok().filter(|secs| *secs > 0);
                secs.map(Duration::from_secs)
                    .ok_or(ConfigError::InvalidTimeout(raw))?
            }
        };

        Ok(Self {
            base_url,
            api_key,
            model,
            timeout,
        })
    }

    pub(crate) fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn missing_key_is_fatal() {
        let err = LlmConfig::from_lookup(lookup(&[("STUDY_AI_MODEL", "x")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingApiKey);
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let err = LlmConfig::from_lookup(lookup(&[("STUDY_AI_API_KEY", "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingApiKey);
    }

    #[test]
    fn falls_back_to_openai_key_and_defaults() {
        let config = LlmConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-test")])).unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(
            config.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn overrides_are_honored() {
        let config = LlmConfig::from_lookup(lookup(&[
            ("STUDY_AI_API_KEY", "k"),
            ("STUDY_AI_BASE_URL", "http://localhost:11434/v1/"),
            ("STUDY_AI_MODEL", "llama3"),
            ("STUDY_AI_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.completions_url(), "http://localhost:11434/v1/chat/completions");
        assert_eq!(config.model, "llama3");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = LlmConfig::from_lookup(lookup(&[
            ("STUDY_AI_API_KEY", "k"),
            ("STUDY_AI_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidTimeout("soon".into()));
    }

    #[test]
    fn debug_hides_api_key() {
        let config = LlmConfig::from_lookup(lookup(&[("STUDY_AI_API_KEY", "secret")])).unwrap();
        assert!(!format!("{config:?}").contains("secret"));
    }
}
