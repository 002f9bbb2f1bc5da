//! Persisted ratio options.
//!
//! Each [`RatioTable`] is stored under its [`RatioTable::key`] as a JSON
//! payload. Loading collects whatever the provider defines; applying feeds
//! each payload through [`RatioResolver::update`], so a table the provider
//! does not define keeps its compiled-in defaults.

use std::collections::HashMap;

use super::provider::{ConfigProvider, ConfigProviderExt};
use super::{ConfigError, ConfigResult};
use crate::resolver::{RatioResolver, RatioResolverBuilder, RatioTable};

/// Option key for the model-ratio fallback.
pub const FALLBACK_KEY: &str = "model_ratio_fallback";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatioSettings {
    payloads: HashMap<RatioTable, String>,
    fallback_model_ratio: Option<f64>,
}

impl RatioSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn payload(mut self, table: RatioTable, json: impl Into<String>) -> Self {
        self.payloads.insert(table, json.into());
        self
    }

    pub fn fallback_model_ratio(mut self, ratio: f64) -> Self {
        self.fallback_model_ratio = Some(ratio);
        self
    }

    pub async fn load(provider: &dyn ConfigProvider) -> ConfigResult<Self> {
        let mut settings = Self::new();
        for table in RatioTable::ALL {
            if let Some(json) = provider.get_raw(table.key()).await? {
                settings.payloads.insert(table, json);
            }
        }

        settings.fallback_model_ratio = provider.get::<f64>(FALLBACK_KEY).await?;
        if let Some(ratio) = settings.fallback_model_ratio
            && (!ratio.is_finite() || ratio < 0.0)
        {
            return Err(ConfigError::InvalidValue {
                key: FALLBACK_KEY.to_string(),
                message: format!("must be a finite value >= 0, got {}", ratio),
            });
        }

        tracing::debug!(
            provider = provider.name(),
            tables = settings.payloads.len(),
            "ratio settings loaded"
        );
        Ok(settings)
    }

    pub fn get(&self, table: RatioTable) -> Option<&str> {
        self.payloads.get(&table).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty() && self.fallback_model_ratio.is_none()
    }

    /// Replace every table present in these settings.
    ///
    /// Tables are applied in [`RatioTable::ALL`] order and the first invalid
    /// payload stops the run. Tables applied before it stay applied; the
    /// failing table and those after it keep their previous contents.
    pub fn apply(&self, resolver: &RatioResolver) -> crate::Result<()> {
        for table in RatioTable::ALL {
            if let Some(json) = self.payloads.get(&table) {
                resolver.update(table, json)?;
            }
        }
        Ok(())
    }

    /// Build a resolver from `builder` with these settings applied on top.
    pub fn build_resolver(&self, builder: RatioResolverBuilder) -> crate::Result<RatioResolver> {
        let builder = match self.fallback_model_ratio {
            Some(ratio) => builder.fallback_model_ratio(ratio),
            None => builder,
        };
        let resolver = builder.build();
        self.apply(&resolver)?;
        Ok(resolver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfigProvider;

    #[tokio::test]
    async fn test_load_collects_defined_tables() {
        let provider = MemoryConfigProvider::new()
            .value("model_ratio", r#"{"gpt-4": 20}"#)
            .value("unrelated", "x");

        let settings = RatioSettings::load(&provider).await.unwrap();
        assert_eq!(settings.get(RatioTable::ModelRatio), Some(r#"{"gpt-4": 20}"#));
        assert_eq!(settings.get(RatioTable::ModelPrice), None);
        assert!(!settings.is_empty());
    }

    #[tokio::test]
    async fn test_load_empty_provider() {
        let settings = RatioSettings::load(&MemoryConfigProvider::new()).await.unwrap();
        assert!(settings.is_empty());
    }

    #[tokio::test]
    async fn test_load_rejects_bad_fallback() {
        let provider = MemoryConfigProvider::new().value(FALLBACK_KEY, "-1");
        let err = RatioSettings::load(&provider).await.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == FALLBACK_KEY));

        let provider = MemoryConfigProvider::new().value(FALLBACK_KEY, "thirty");
        assert!(RatioSettings::load(&provider).await.is_err());
    }

    #[test]
    fn test_apply_replaces_tables() {
        let resolver = RatioResolver::new();
        RatioSettings::new()
            .payload(RatioTable::ModelRatio, r#"{"gpt-4": 20}"#)
            .payload(RatioTable::ModelPrice, r#"{"flux": 0.03}"#)
            .apply(&resolver)
            .unwrap();

        assert_eq!(resolver.model_ratio("gpt-4"), 20.0);
        // whole-table replacement
        assert_eq!(resolver.model_ratio("gpt-4o"), 30.0);
        assert_eq!(resolver.model_price("flux", false), Some(0.03));
        // untouched tables keep defaults
        assert!(resolver.threshold("claude-sonnet-4").is_some());
    }

    #[test]
    fn test_apply_stops_at_first_invalid_table() {
        let resolver = RatioResolver::new();
        let err = RatioSettings::new()
            .payload(RatioTable::ModelRatio, r#"{"gpt-4": 20}"#)
            .payload(RatioTable::ModelPrice, "{broken")
            .payload(RatioTable::CompletionRatio, r#"{"gpt-4": 9}"#)
            .apply(&resolver)
            .unwrap_err();

        assert_eq!(err.table(), Some(RatioTable::ModelPrice));
        assert_eq!(resolver.model_ratio("gpt-4"), 20.0);
        assert_eq!(resolver.model_price("dall-e-3", false), Some(0.04));
        assert_eq!(resolver.generation(RatioTable::CompletionRatio), 0);
    }

    #[test]
    fn test_build_resolver_uses_fallback() {
        let resolver = RatioSettings::new()
            .fallback_model_ratio(45.0)
            .build_resolver(RatioResolver::builder())
            .unwrap();
        assert_eq!(resolver.model_ratio("never-heard-of-it"), 45.0);
    }
}
