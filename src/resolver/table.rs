use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// The four operator-configurable tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioTable {
    ModelRatio,
    ModelPrice,
    CompletionRatio,
    ThresholdRatio,
}

impl RatioTable {
    pub const ALL: [RatioTable; 4] = [
        RatioTable::ModelRatio,
        RatioTable::ModelPrice,
        RatioTable::CompletionRatio,
        RatioTable::ThresholdRatio,
    ];

    /// Table name; also the configuration key holding its persisted payload.
    pub fn key(&self) -> &'static str {
        match self {
            Self::ModelRatio => "model_ratio",
            Self::ModelPrice => "model_price",
            Self::CompletionRatio => "completion_ratio",
            Self::ThresholdRatio => "threshold_ratio",
        }
    }
}

impl fmt::Display for RatioTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for RatioTable {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|table| table.key() == s)
            .ok_or_else(|| Error::Config(format!("unknown ratio table: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_roundtrip() {
        for table in RatioTable::ALL {
            assert_eq!(table.key().parse::<RatioTable>().unwrap(), table);
        }
    }

    #[test]
    fn test_unknown_table() {
        assert!("group_ratio".parse::<RatioTable>().is_err());
    }

    #[test]
    fn test_serde_matches_key() {
        let json = serde_json::to_string(&RatioTable::ThresholdRatio).unwrap();
        assert_eq!(json, r#""threshold_ratio""#);
    }
}
