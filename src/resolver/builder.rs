use std::collections::HashMap;

use super::{MODEL_RATIO_FALLBACK, RatioResolver, RatioTable};
use crate::defaults;
use crate::normalize::NameNormalizer;
use crate::rules::{RuleEngine, audio_completion_rules, audio_rules, completion_rules};
use crate::store::RatioStore;
use crate::threshold::ThresholdConfig;

/// Builder for [`RatioResolver`]. Anything not set uses the built-in tables.
#[derive(Debug, Default)]
pub struct RatioResolverBuilder {
    normalizer: Option<NameNormalizer>,
    model_ratios: Option<HashMap<String, f64>>,
    model_prices: Option<HashMap<String, f64>>,
    completion_ratios: Option<HashMap<String, f64>>,
    thresholds: Option<HashMap<String, ThresholdConfig>>,
    completion_rules: Option<RuleEngine>,
    audio_rules: Option<RuleEngine>,
    audio_completion_rules: Option<RuleEngine>,
    fallback_model_ratio: Option<f64>,
}

impl RatioResolverBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalizer(mut self, normalizer: NameNormalizer) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    /// Compiled-in model ratios; the active table starts as a copy.
    ///
    /// The completion table is the exception: its defaults are only exported
    /// and its active table starts empty.
    pub fn model_ratios(mut self, defaults: HashMap<String, f64>) -> Self {
        self.model_ratios = Some(defaults);
        self
    }

    pub fn model_prices(mut self, defaults: HashMap<String, f64>) -> Self {
        self.model_prices = Some(defaults);
        self
    }

    pub fn completion_ratios(mut self, defaults: HashMap<String, f64>) -> Self {
        self.completion_ratios = Some(defaults);
        self
    }

    pub fn thresholds(mut self, defaults: HashMap<String, ThresholdConfig>) -> Self {
        self.thresholds = Some(defaults);
        self
    }

    pub fn completion_rules(mut self, rules: RuleEngine) -> Self {
        self.completion_rules = Some(rules);
        self
    }

    pub fn audio_rules(mut self, rules: RuleEngine) -> Self {
        self.audio_rules = Some(rules);
        self
    }

    pub fn audio_completion_rules(mut self, rules: RuleEngine) -> Self {
        self.audio_completion_rules = Some(rules);
        self
    }

    pub fn fallback_model_ratio(mut self, ratio: f64) -> Self {
        self.fallback_model_ratio = Some(ratio);
        self
    }

    pub fn build(self) -> RatioResolver {
        RatioResolver {
            normalizer: self.normalizer.unwrap_or_default(),
            model_ratios: RatioStore::new(
                RatioTable::ModelRatio,
                self.model_ratios.unwrap_or_else(defaults::model_ratios),
            ),
            model_prices: RatioStore::new(
                RatioTable::ModelPrice,
                self.model_prices.unwrap_or_else(defaults::model_prices),
            ),
            // Exported as defaults but never consulted until an operator update.
            completion_ratios: RatioStore::unseeded(
                RatioTable::CompletionRatio,
                self.completion_ratios
                    .unwrap_or_else(defaults::completion_ratios),
            ),
            thresholds: RatioStore::new(
                RatioTable::ThresholdRatio,
                self.thresholds.unwrap_or_else(defaults::thresholds),
            ),
            completion_rules: self.completion_rules.unwrap_or_else(completion_rules),
            audio_rules: self.audio_rules.unwrap_or_else(audio_rules),
            audio_completion_rules: self
                .audio_completion_rules
                .unwrap_or_else(audio_completion_rules),
            fallback_model_ratio: self.fallback_model_ratio.unwrap_or(MODEL_RATIO_FALLBACK),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Matcher, Rule};

    #[test]
    fn test_builder_defaults() {
        let resolver = RatioResolverBuilder::new().build();
        assert!(resolver.model_ratios().contains("gpt-4o"));
        assert!(resolver.thresholds().contains("claude-sonnet-4"));
    }

    #[test]
    fn test_builder_custom_tables() {
        let resolver = RatioResolver::builder()
            .model_ratios(HashMap::from([("local-model".to_string(), 0.5)]))
            .model_prices(HashMap::new())
            .thresholds(HashMap::new())
            .fallback_model_ratio(50.0)
            .build();

        assert_eq!(resolver.model_ratio("local-model"), 0.5);
        assert_eq!(resolver.model_ratio("gpt-4"), 50.0);
        assert_eq!(resolver.model_price("dall-e-3", false), None);
        assert!(resolver.threshold("claude-sonnet-4").is_none());
    }

    #[test]
    fn test_builder_custom_rules_and_normalizer() {
        let rules = RuleEngine::new(1.0).rule(Rule::fixed("acme", Matcher::prefix("acme-"), 6.0));
        let resolver = RatioResolver::builder()
            .normalizer(NameNormalizer::new().rule("acme-ft-", "acme-ft-*"))
            .model_ratios(HashMap::from([("acme-ft-*".to_string(), 2.0)]))
            .completion_rules(rules)
            .build();

        assert_eq!(resolver.completion_ratio("acme-large"), 6.0);
        assert_eq!(resolver.model_ratio("acme-ft-customer-42"), 2.0);
        // builtin gizmo normalization replaced
        assert_eq!(resolver.model_ratio("gpt-4-gizmo-x"), MODEL_RATIO_FALLBACK);
    }
}
