//! # ratio-engine
//!
//! Billing ratio resolution for an LLM API proxy.
//!
//! Every request is billed from a handful of multipliers looked up by model
//! name: the input token ratio, the completion (output) ratio, an optional
//! flat per-call price, and an optional long-context tier. This crate owns
//! those tables, the vendor rules behind completion ratios, and the name
//! normalization that maps per-instance model names onto a shared entry.
//!
//! ## Quick Start
//!
//! ```rust
//! use ratio_engine::{RatioResolver, RatioTable};
//!
//! let resolver = RatioResolver::new();
//!
//! assert_eq!(resolver.model_ratio("gpt-4"), 15.0);
//! assert_eq!(resolver.completion_ratio("claude-3-opus"), 5.0);
//! assert_eq!(resolver.model_price("dall-e-3", false), Some(0.04));
//!
//! // Operator update: replaces the whole table or nothing.
//! resolver
//!     .update(RatioTable::ModelRatio, r#"{"gpt-4": 20}"#)
//!     .unwrap();
//! assert_eq!(resolver.model_ratio("gpt-4"), 20.0);
//! ```
//!
//! ## Long-context pricing
//!
//! ```rust
//! use ratio_engine::RatioResolver;
//!
//! let resolver = RatioResolver::new();
//! let ratios = resolver.effective_ratios("claude-sonnet-4", 250_000);
//! assert!(ratios.tiered);
//! assert_eq!(ratios.model_ratio, 10.0);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod defaults;
pub mod normalize;
pub mod resolver;
pub mod rules;
pub mod store;
pub mod threshold;

pub use config::{ConfigBuilder, ConfigProvider, RatioSettings};
pub use normalize::{FamilyRule, NameNormalizer};
pub use resolver::{
    EffectiveRatios, MODEL_RATIO_FALLBACK, RatioResolver, RatioResolverBuilder, RatioTable,
};
pub use rules::{Matcher, RatioSource, Rule, RuleEngine};
pub use store::{RatioStore, RatioValue};
pub use threshold::ThresholdConfig;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// JSON serialization or deserialization failed.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// A table update payload was not a valid JSON object of the right shape.
    #[error("Invalid {table} payload: {source}")]
    Payload {
        table: RatioTable,
        #[source]
        source: serde_json::Error,
    },

    /// A table update parsed but one entry failed validation.
    #[error("Invalid {table} entry {key:?}: {message}")]
    InvalidEntry {
        table: RatioTable,
        key: String,
        message: String,
    },

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable set but unreadable.
    #[error("Environment error: {0}")]
    Env(#[from] std::env::VarError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The table a rejected update targeted, when known.
    pub fn table(&self) -> Option<RatioTable> {
        match self {
            Error::Payload { table, .. } | Error::InvalidEntry { table, .. } => Some(*table),
            _ => None,
        }
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::Json(_) | Error::Payload { .. })
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::InvalidValue { key, message } => {
                Error::Config(format!("Invalid value for {}: {}", key, message))
            }
            config::ConfigError::Serialization(e) => Error::Json(e),
            config::ConfigError::Io(e) => Error::Io(e),
            config::ConfigError::Env(e) => Error::Env(e),
            config::ConfigError::Provider { message } => Error::Config(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_error_names_table() {
        let source = serde_json::from_str::<f64>("x").unwrap_err();
        let err = Error::Payload {
            table: RatioTable::CompletionRatio,
            source,
        };

        assert!(err.is_parse_error());
        assert_eq!(err.table(), Some(RatioTable::CompletionRatio));
        assert!(err.to_string().starts_with("Invalid completion_ratio payload"));
    }

    #[test]
    fn test_untabled_errors() {
        let err = Error::Config("x".into());
        assert!(!err.is_parse_error());
        assert_eq!(err.table(), None);
    }

    #[test]
    fn test_invalid_entry_table() {
        let err = Error::InvalidEntry {
            table: RatioTable::ThresholdRatio,
            key: "m".into(),
            message: "threshold must be > 0".into(),
        };
        assert!(!err.is_parse_error());
        assert_eq!(err.table(), Some(RatioTable::ThresholdRatio));
        assert_eq!(
            err.to_string(),
            "Invalid threshold_ratio entry \"m\": threshold must be > 0"
        );
    }

    #[test]
    fn test_from_config_error() {
        let err: Error = config::ConfigError::InvalidValue {
            key: "model_ratio_fallback".into(),
            message: "bad".into(),
        }
        .into();
        assert!(matches!(err, Error::Config(msg) if msg.contains("model_ratio_fallback")));
    }
}
