//! Environment variable provider.
//!
//! Keys map to upper-case variable names: with prefix `RATIO_`, the option
//! `model_ratio` is read from `RATIO_MODEL_RATIO`.

use super::provider::ConfigProvider;
use super::{ConfigError, ConfigResult};

/// Read-only provider over the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvConfigProvider {
    prefix: Option<String>,
}

impl EnvConfigProvider {
    pub fn new() -> Self {
        Self { prefix: None }
    }

    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    fn env_key(&self, key: &str) -> String {
        let key = key.to_uppercase().replace('.', "_");
        match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, key),
            None => key,
        }
    }

    fn key_from_env(&self, env_name: &str) -> Option<String> {
        let stripped = match &self.prefix {
            Some(prefix) => env_name.strip_prefix(prefix.as_str())?,
            None => env_name,
        };
        Some(stripped.to_lowercase())
    }
}

#[async_trait::async_trait]
impl ConfigProvider for EnvConfigProvider {
    fn name(&self) -> &str {
        "env"
    }

    async fn get_raw(&self, key: &str) -> ConfigResult<Option<String>> {
        match std::env::var(self.env_key(key)) {
            Ok(value) => Ok(Some(value)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(ConfigError::Env(e)),
        }
    }

    async fn list_keys(&self, prefix: &str) -> ConfigResult<Vec<String>> {
        Ok(std::env::vars()
            .filter_map(|(name, _)| self.key_from_env(&name))
            .filter(|key| key.starts_with(prefix))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_key_conversion() {
        let provider = EnvConfigProvider::prefixed("RATIO_");
        assert_eq!(provider.env_key("model_ratio"), "RATIO_MODEL_RATIO");
        assert_eq!(provider.env_key("billing.model_price"), "RATIO_BILLING_MODEL_PRICE");

        let bare = EnvConfigProvider::new();
        assert_eq!(bare.env_key("completion_ratio"), "COMPLETION_RATIO");
    }

    #[test]
    fn test_key_from_env() {
        let provider = EnvConfigProvider::prefixed("RATIO_");
        assert_eq!(
            provider.key_from_env("RATIO_THRESHOLD_RATIO"),
            Some("threshold_ratio".to_string())
        );
        assert_eq!(provider.key_from_env("PATH"), None);
    }

    #[tokio::test]
    async fn test_env_provider_get() {
        // PATH is present in every test environment.
        let provider = EnvConfigProvider::new();
        assert!(provider.get_raw("path").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_env_provider_not_found() {
        let provider = EnvConfigProvider::prefixed("RATIO_ENGINE_UNSET_PREFIX_");
        assert_eq!(provider.get_raw("model_ratio").await.unwrap(), None);
        assert!(provider.list_keys("").await.unwrap().is_empty());
    }
}
