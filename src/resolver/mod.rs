//! The ratio resolution entry points consumed by the billing layer.
//!
//! A [`RatioResolver`] is built once at startup and shared by reference (or
//! `Arc`) with every request handler. All queries are synchronous and only
//! take read locks; table updates replace one table at a time with no
//! atomicity across tables.

mod builder;
mod table;

pub use builder::RatioResolverBuilder;
pub use table::RatioTable;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::normalize::NameNormalizer;
use crate::rules::RuleEngine;
use crate::store::RatioStore;
use crate::threshold::ThresholdConfig;

/// Model ratio used when a model has no entry, high so new models are not under-billed.
pub const MODEL_RATIO_FALLBACK: f64 = 30.0;

#[derive(Debug)]
pub struct RatioResolver {
    normalizer: NameNormalizer,
    model_ratios: RatioStore<f64>,
    model_prices: RatioStore<f64>,
    completion_ratios: RatioStore<f64>,
    thresholds: RatioStore<ThresholdConfig>,
    completion_rules: RuleEngine,
    audio_rules: RuleEngine,
    audio_completion_rules: RuleEngine,
    fallback_model_ratio: f64,
}

/// Ratios to bill one request with, after threshold tiering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveRatios {
    pub model_ratio: f64,
    pub completion_ratio: f64,
    /// The long-context tier replaced the standard ratios.
    pub tiered: bool,
}

impl RatioResolver {
    /// Resolver with the built-in tables and rules.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> RatioResolverBuilder {
        RatioResolverBuilder::new()
    }

    pub fn normalizer(&self) -> &NameNormalizer {
        &self.normalizer
    }

    pub fn completion_rules(&self) -> &RuleEngine {
        &self.completion_rules
    }

    pub fn model_ratios(&self) -> &RatioStore<f64> {
        &self.model_ratios
    }

    pub fn model_prices(&self) -> &RatioStore<f64> {
        &self.model_prices
    }

    pub fn completion_ratios(&self) -> &RatioStore<f64> {
        &self.completion_ratios
    }

    pub fn thresholds(&self) -> &RatioStore<ThresholdConfig> {
        &self.thresholds
    }

    /// Input token ratio for `name`; unknown models get the fallback ratio.
    pub fn model_ratio(&self, name: &str) -> f64 {
        let key = self.normalizer.normalize(name);
        match self.model_ratios.get(&key) {
            Some(ratio) => ratio,
            None => {
                tracing::warn!(
                    model = name,
                    fallback = self.fallback_model_ratio,
                    "model ratio not found"
                );
                self.fallback_model_ratio
            }
        }
    }

    /// Flat per-call price for `name`, `None` when the model is token-metered.
    ///
    /// `verbose` logs misses; speculative callers pass `false`.
    pub fn model_price(&self, name: &str, verbose: bool) -> Option<f64> {
        let key = self.normalizer.normalize(name);
        let price = self.model_prices.get(&key);
        if price.is_none() && verbose {
            tracing::warn!(model = name, "model price not found");
        }
        price
    }

    /// Output token multiplier relative to input tokens.
    ///
    /// A strictly positive override for the normalized name wins; otherwise
    /// the vendor rule table decides.
    pub fn completion_ratio(&self, name: &str) -> f64 {
        let key = self.normalizer.normalize(name);
        if let Some(ratio) = self.completion_ratios.get(&key)
            && ratio > 0.0
        {
            return ratio;
        }
        self.completion_rules.evaluate(&key)
    }

    /// Long-context breakpoint configured for `name`, if any.
    ///
    /// The caller compares its context length against `threshold`, or uses
    /// [`effective_ratios`](Self::effective_ratios).
    pub fn threshold(&self, name: &str) -> Option<ThresholdConfig> {
        let key = self.normalizer.normalize(name);
        self.thresholds.get(&key)
    }

    pub fn audio_ratio(&self, name: &str) -> f64 {
        self.audio_rules.evaluate(name)
    }

    pub fn audio_completion_ratio(&self, name: &str) -> f64 {
        self.audio_completion_rules.evaluate(name)
    }

    /// Model and completion ratios for a request with `context_tokens` of context.
    pub fn effective_ratios(&self, name: &str, context_tokens: u64) -> EffectiveRatios {
        if let Some(tier) = self.threshold(name)
            && tier.applies(context_tokens)
        {
            tracing::debug!(
                model = name,
                context_tokens,
                threshold = tier.threshold,
                "long-context tier applied"
            );
            return EffectiveRatios {
                model_ratio: tier.input_ratio,
                completion_ratio: tier.output_ratio,
                tiered: true,
            };
        }
        EffectiveRatios {
            model_ratio: self.model_ratio(name),
            completion_ratio: self.completion_ratio(name),
            tiered: false,
        }
    }

    /// Replace one table from a JSON payload. A failed update changes nothing.
    pub fn update(&self, table: RatioTable, json: &str) -> Result<()> {
        match table {
            RatioTable::ModelRatio => self.model_ratios.update_from_json(json),
            RatioTable::ModelPrice => self.model_prices.update_from_json(json),
            RatioTable::CompletionRatio => self.completion_ratios.update_from_json(json),
            RatioTable::ThresholdRatio => self.thresholds.update_from_json(json),
        }
    }

    /// JSON of the active table.
    pub fn export(&self, table: RatioTable) -> String {
        match table {
            RatioTable::ModelRatio => self.model_ratios.to_json(),
            RatioTable::ModelPrice => self.model_prices.to_json(),
            RatioTable::CompletionRatio => self.completion_ratios.to_json(),
            RatioTable::ThresholdRatio => self.thresholds.to_json(),
        }
    }

    /// JSON of the compiled-in defaults for a table.
    pub fn export_defaults(&self, table: RatioTable) -> String {
        match table {
            RatioTable::ModelRatio => self.model_ratios.defaults_json(),
            RatioTable::ModelPrice => self.model_prices.defaults_json(),
            RatioTable::CompletionRatio => self.completion_ratios.defaults_json(),
            RatioTable::ThresholdRatio => self.thresholds.defaults_json(),
        }
    }

    /// Change counter of a table, for callers caching exports.
    pub fn generation(&self, table: RatioTable) -> u64 {
        match table {
            RatioTable::ModelRatio => self.model_ratios.generation(),
            RatioTable::ModelPrice => self.model_prices.generation(),
            RatioTable::CompletionRatio => self.completion_ratios.generation(),
            RatioTable::ThresholdRatio => self.thresholds.generation(),
        }
    }
}

impl Default for RatioResolver {
    fn default() -> Self {
        Self::new()
    }
}
