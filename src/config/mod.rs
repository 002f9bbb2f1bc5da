//! Option providers and persisted ratio settings.
//!
//! ```rust,no_run
//! use ratio_engine::RatioResolver;
//! use ratio_engine::config::{ConfigBuilder, RatioSettings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = ConfigBuilder::new()
//!     .env_with_prefix("RATIO_")
//!     .file("options.json")
//!     .build();
//!
//! let resolver = RatioResolver::new();
//! RatioSettings::load(&options).await?.apply(&resolver)?;
//! # Ok(())
//! # }
//! ```

pub mod composite;
pub mod env;
pub mod file;
pub mod memory;
pub mod provider;
pub mod settings;

pub use composite::CompositeConfigProvider;
pub use env::EnvConfigProvider;
pub use file::FileConfigProvider;
pub use memory::MemoryConfigProvider;
pub use provider::{ConfigProvider, ConfigProviderExt};
pub use settings::{FALLBACK_KEY, RatioSettings};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Value present but not usable
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Options file is not valid JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Variable set but not valid unicode
    #[error("Environment error: {0}")]
    Env(#[from] std::env::VarError),

    #[error("Provider error: {message}")]
    Provider { message: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Layered options source. Layers added first take precedence.
#[derive(Default)]
pub struct ConfigBuilder {
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn env(mut self) -> Self {
        self.providers.push(Box::new(EnvConfigProvider::new()));
        self
    }

    pub fn env_with_prefix(mut self, prefix: &str) -> Self {
        self.providers.push(Box::new(EnvConfigProvider::prefixed(prefix)));
        self
    }

    pub fn file(mut self, path: impl AsRef<std::path::Path>) -> Self {
        self.providers
            .push(Box::new(FileConfigProvider::new(path.as_ref())));
        self
    }

    pub fn memory(mut self, provider: MemoryConfigProvider) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn provider(mut self, provider: Box<dyn ConfigProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn build(self) -> CompositeConfigProvider {
        self.providers
            .into_iter()
            .fold(CompositeConfigProvider::new(), CompositeConfigProvider::provider)
    }
}
