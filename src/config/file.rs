//! JSON options file provider.
//!
//! The file is a single JSON object keyed by option name. A ratio table may be
//! stored either as a nested object or as its payload string:
//!
//! ```json
//! {
//!   "model_ratio": {"gpt-4": 15},
//!   "completion_ratio": "{\"gpt-4\": 2}"
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::sync::RwLock;

use super::ConfigResult;
use super::provider::ConfigProvider;

pub struct FileConfigProvider {
    path: PathBuf,
    data: RwLock<Option<HashMap<String, serde_json::Value>>>,
    auto_reload: bool,
}

impl FileConfigProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: RwLock::new(None),
            auto_reload: false,
        }
    }

    /// Re-read the file on every lookup.
    pub fn auto_reload(path: impl Into<PathBuf>) -> Self {
        Self {
            auto_reload: true,
            ..Self::new(path)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> ConfigResult<HashMap<String, serde_json::Value>> {
        if !tokio::fs::try_exists(&self.path).await? {
            tracing::debug!(path = %self.path.display(), "options file missing, using defaults");
            return Ok(HashMap::new());
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn ensure_loaded(&self) -> ConfigResult<()> {
        if !self.auto_reload && self.data.read().await.is_some() {
            return Ok(());
        }

        let mut data = self.data.write().await;
        if data.is_none() || self.auto_reload {
            *data = Some(self.load().await?);
        }
        Ok(())
    }

    pub async fn reload(&self) -> ConfigResult<()> {
        let loaded = self.load().await?;
        *self.data.write().await = Some(loaded);
        Ok(())
    }
}

#[async_trait::async_trait]
impl ConfigProvider for FileConfigProvider {
    fn name(&self) -> &str {
        "file"
    }

    async fn get_raw(&self, key: &str) -> ConfigResult<Option<String>> {
        self.ensure_loaded().await?;

        let data = self.data.read().await;
        let value = data.as_ref().and_then(|map| {
            let mut parts = key.split('.');
            let first = map.get(parts.next()?)?;
            parts.try_fold(first, |value, part| value.get(part))
        });

        Ok(value.map(|v| match v {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }))
    }

    async fn list_keys(&self, prefix: &str) -> ConfigResult<Vec<String>> {
        self.ensure_loaded().await?;

        let data = self.data.read().await;
        Ok(data
            .iter()
            .flat_map(|map| map.keys())
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}
