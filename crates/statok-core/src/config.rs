//! Analytics configuration
//!
//! Loaded from an optional TOML file. Every field has a default, so an empty
//! file (or no file at all) yields the standard report settings:
//!
//! ```toml
//! forecast_months = 3
//! history_months = 6
//! velocity_months = 3
//! urgent_days = 30
//! default_period_months = 12
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Tunable settings for report generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Number of future months to project
    pub forecast_months: u32,
    /// Months of history fed to the forecaster
    pub history_months: u32,
    /// Most recent populated months averaged into savings velocity
    pub velocity_months: u32,
    /// A goal whose deadline is this close is flagged "Urgent"
    pub urgent_days: i64,
    /// Report period used when none is requested
    pub default_period_months: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            forecast_months: 3,
            history_months: 6,
            velocity_months: 3,
            urgent_days: 30,
            default_period_months: 12,
        }
    }
}

impl AnalyticsConfig {
    /// Parse config from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| Error::Config(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "Loaded analytics config");
        Self::from_toml(&text)
    }

    /// Load from an explicit path, else the default location, else defaults
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Default config location (`<config_dir>/statok/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("statok").join("config.toml"))
    }

    fn validate(&self) -> Result<()> {
        if self.forecast_months == 0 {
            return Err(Error::Config("forecast_months must be at least 1".into()));
        }
        if self.history_months < 2 {
            return Err(Error::Config("history_months must be at least 2".into()));
        }
        if self.velocity_months == 0 {
            return Err(Error::Config("velocity_months must be at least 1".into()));
        }
        if self.urgent_days < 0 {
            return Err(Error::Config("urgent_days must not be negative".into()));
        }
        if self.default_period_months == 0 {
            return Err(Error::Config(
                "default_period_months must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AnalyticsConfig::from_toml("").unwrap();
        assert_eq!(config, AnalyticsConfig::default());
        assert_eq!(config.forecast_months, 3);
        assert_eq!(config.urgent_days, 30);
    }

    #[test]
    fn test_partial_config() {
        let config = AnalyticsConfig::from_toml("forecast_months = 6\n").unwrap();
        assert_eq!(config.forecast_months, 6);
        assert_eq!(config.history_months, 6);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(AnalyticsConfig::from_toml("forecast_months = 0").is_err());
        assert!(AnalyticsConfig::from_toml("history_months = 1").is_err());
        assert!(AnalyticsConfig::from_toml("forecast_months = \"x\"").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "velocity_months = 4").unwrap();

        let config = AnalyticsConfig::load_or_default(Some(file.path())).unwrap();
        assert_eq!(config.velocity_months, 4);
    }
}
