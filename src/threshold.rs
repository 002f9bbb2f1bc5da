//! Context-length threshold pricing.
//!
//! A model may carry a single breakpoint: once a request's context length
//! exceeds `threshold` tokens, `input_ratio`/`output_ratio` replace the
//! standard model and completion ratios for that request.

use serde::{Deserialize, Serialize};

use crate::store::RatioValue;

/// One breakpoint for one model.
///
/// Serialized as `{"threshold", "inputRatio", "outputRatio", "enabled"}`;
/// `modelName` is optional in payloads and filled from the table key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ThresholdConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model_name: String,
    pub threshold: u64,
    pub input_ratio: f64,
    pub output_ratio: f64,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl ThresholdConfig {
    pub fn new(
        model_name: impl Into<String>,
        threshold: u64,
        input_ratio: f64,
        output_ratio: f64,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            threshold,
            input_ratio,
            output_ratio,
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Whether a request with `context_tokens` falls in the upper tier.
    pub fn applies(&self, context_tokens: u64) -> bool {
        self.enabled && context_tokens > self.threshold
    }
}

impl RatioValue for ThresholdConfig {
    fn validate(&self) -> Result<(), String> {
        if self.threshold == 0 {
            return Err("threshold must be > 0".into());
        }
        for (field, ratio) in [("inputRatio", self.input_ratio), ("outputRatio", self.output_ratio)]
        {
            if !ratio.is_finite() || ratio < 0.0 {
                return Err(format!("{} must be a finite value >= 0, got {}", field, ratio));
            }
        }
        Ok(())
    }

    fn bind_key(&mut self, key: &str) {
        if self.model_name.is_empty() {
            self.model_name = key.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applies_strictly_above_threshold() {
        let config = ThresholdConfig::new("claude-sonnet-4", 200_000, 10.0, 30.0);
        assert!(!config.applies(100_000));
        assert!(!config.applies(200_000));
        assert!(config.applies(200_001));
    }

    #[test]
    fn test_disabled_never_applies() {
        let config = ThresholdConfig::new("m", 10, 1.0, 2.0).disabled();
        assert!(!config.applies(1_000_000));
    }

    #[test]
    fn test_parse_camel_case_payload() {
        let config: ThresholdConfig = serde_json::from_str(
            r#"{"threshold": 128000, "inputRatio": 2.5, "outputRatio": 7.5, "enabled": false}"#,
        )
        .unwrap();
        assert_eq!(config.threshold, 128_000);
        assert_eq!(config.input_ratio, 2.5);
        assert!(!config.enabled);
        assert!(config.model_name.is_empty());
    }

    #[test]
    fn test_enabled_defaults_to_true() {
        let config: ThresholdConfig =
            serde_json::from_str(r#"{"threshold": 1, "inputRatio": 1, "outputRatio": 1}"#)
                .unwrap();
        assert!(config.enabled);
    }

    #[test]
    fn test_other_schema_rejected() {
        let result: Result<ThresholdConfig, _> = serde_json::from_str(
            r#"{"threshold": 1, "modelRatio": 1, "completionRatio": 1}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validation() {
        assert!(ThresholdConfig::new("m", 1, 0.0, 0.0).validate().is_ok());
        assert!(ThresholdConfig::new("m", 0, 1.0, 1.0).validate().is_err());
        assert!(ThresholdConfig::new("m", 1, -1.0, 1.0).validate().is_err());
        assert!(ThresholdConfig::new("m", 1, 1.0, f64::NAN).validate().is_err());
    }

    #[test]
    fn test_bind_key_fills_missing_name() {
        let mut config = ThresholdConfig::new("", 1, 1.0, 1.0);
        config.bind_key("gemini-2.5-pro");
        assert_eq!(config.model_name, "gemini-2.5-pro");

        let mut named = ThresholdConfig::new("kept", 1, 1.0, 1.0);
        named.bind_key("other");
        assert_eq!(named.model_name, "kept");
    }
}
