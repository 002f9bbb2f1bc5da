//! Values a [`RatioStore`](super::RatioStore) can hold.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A table value that can be validated before it becomes visible to readers.
pub trait RatioValue: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Check the value's invariants. The message is reported with the key.
    fn validate(&self) -> Result<(), String>;

    /// Fill fields derived from the table key after parsing a payload.
    fn bind_key(&mut self, _key: &str) {}
}

impl RatioValue for f64 {
    fn validate(&self) -> Result<(), String> {
        if !self.is_finite() {
            return Err(format!("ratio must be finite, got {}", self));
        }
        if *self < 0.0 {
            return Err(format!("ratio must be >= 0, got {}", self));
        }
        Ok(())
    }
}
