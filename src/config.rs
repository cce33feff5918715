use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_MIN_SUPPORT: f64 = 0.5;

/// Parameters of one mining + compression run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    /// Fraction of transactions an itemset must appear in, in `(0, 1]`.
    pub min_support: f64,
    /// Longest itemset to mine. `None` mines until a level comes back empty.
    pub max_len: Option<usize>,
    /// Cap on dictionary entries. `None` keeps every eligible itemset.
    pub max_entries: Option<usize>,
    /// Prepended to every generated code. Must not contain whitespace, since
    /// compressed lines are split on it.
    pub code_prefix: String,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            min_support: DEFAULT_MIN_SUPPORT,
            max_len: None,
            max_entries: None,
            code_prefix: String::new(),
        }
    }
}

impl MiningConfig {
    pub fn new(min_support: f64) -> Self {
        Self {
            min_support,
            ..Self::default()
        }
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    pub fn with_code_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.code_prefix = prefix.into();
        self
    }

    /// Reads a JSON config file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_min_support(self.min_support)?;
        if self.max_len == Some(0) {
            return Err(Error::InvalidMaxLen);
        }
        if self.max_entries == Some(0) {
            return Err(Error::InvalidMaxEntries);
        }
        if self.code_prefix.chars().any(|c| c.is_ascii_whitespace()) {
            return Err(Error::InvalidCodePrefix(self.code_prefix.clone()));
        }
        Ok(())
    }
}

pub(crate) fn validate_min_support(min_support: f64) -> Result<()> {
    // NaN fails both comparisons
    if min_support > 0.0 && min_support <= 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidMinSupport(min_support))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(MiningConfig::default().validate().is_ok());
    }

    #[test]
    fn min_support_bounds() {
        assert!(MiningConfig::new(1.0).validate().is_ok());
        assert!(MiningConfig::new(0.0001).validate().is_ok());
        assert!(matches!(
            MiningConfig::new(0.0).validate(),
            Err(Error::InvalidMinSupport(_))
        ));
        assert!(matches!(
            MiningConfig::new(1.5).validate(),
            Err(Error::InvalidMinSupport(_))
        ));
        assert!(matches!(
            MiningConfig::new(-0.2).validate(),
            Err(Error::InvalidMinSupport(_))
        ));
        assert!(matches!(
            MiningConfig::new(f64::NAN).validate(),
            Err(Error::InvalidMinSupport(_))
        ));
    }

    #[test]
    fn zero_limits_are_rejected() {
        assert!(matches!(
            MiningConfig::default().with_max_len(0).validate(),
            Err(Error::InvalidMaxLen)
        ));
        assert!(matches!(
            MiningConfig::default().with_max_entries(0).validate(),
            Err(Error::InvalidMaxEntries)
        ));
    }

    #[test]
    fn code_prefix_without_whitespace() {
        assert!(MiningConfig::default().with_code_prefix("~").validate().is_ok());
        for prefix in ["x y", "\t", "#\n"] {
            assert!(matches!(
                MiningConfig::default().with_code_prefix(prefix).validate(),
                Err(Error::InvalidCodePrefix(_))
            ));
        }
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: MiningConfig = serde_json::from_str(r#"{"max_len": 2}"#).unwrap();
        assert_eq!(config.min_support, DEFAULT_MIN_SUPPORT);
        assert_eq!(config.max_len, Some(2));
        assert_eq!(config.max_entries, None);
        assert_eq!(config.code_prefix, "");
    }
}
