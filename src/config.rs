//! Configuration management for date-hierarchy

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use crate::drilldown::{Policy, PolicyKind, DEFAULT_PAST_YEARS};
use crate::error::{Error, Result};
use crate::zone::Zone;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Range resolution settings
    pub range: RangeConfig,

    /// Drill-down settings
    pub drilldown: DrilldownConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Range resolution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeConfig {
    /// Attach a time zone to resolved ranges (naive ranges when false)
    pub use_tz: bool,

    /// Zone attached to ranges: an IANA name such as "Europe/Berlin",
    /// or a fixed offset such as "+02:00"
    pub timezone: String,

    /// Column the range filter applies to
    pub field: String,
}

/// Drill-down settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrilldownConfig {
    /// Which dates to offer at the next level
    pub policy: PolicyKind,

    /// Years offered at the top level by the past-only policy
    pub past_years: u32,
}

// Default implementations

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            use_tz: true,
            timezone: "+00:00".to_string(),
            field: "created".to_string(),
        }
    }
}

impl Default for DrilldownConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::Default,
            past_years: DEFAULT_PAST_YEARS,
        }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            debug!("Loading configuration from {}", config_path.display());
            let contents = std::fs::read_to_string(&config_path)?;
            let config: Self = toml::from_str(&contents)?;
            Ok(config)
        } else {
            debug!("No configuration at {}, using defaults", config_path.display());
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::config("Could not determine config directory"))?;
        Ok(config_dir.join("date-hierarchy").join("config.toml"))
    }

    /// The zone to attach to resolved ranges, or `None` for naive ranges.
    pub fn timezone(&self) -> Result<Option<Zone>> {
        if !self.range.use_tz {
            return Ok(None);
        }
        self.range.timezone.parse().map(Some)
    }

    /// The configured drill-down policy.
    #[must_use]
    pub const fn policy(&self) -> Policy {
        Policy::new(self.drilldown.policy, self.drilldown.past_years)
    }

    /// Validate configuration values.
    ///
    /// Call this after loading to ensure all values are within acceptable ranges.
    pub fn validate(&self) -> Result<()> {
        if self.drilldown.past_years == 0 {
            return Err(Error::config("past_years must be at least 1"));
        }

        if self.range.field.trim().is_empty() {
            return Err(Error::config("range.field must not be empty"));
        }

        self.range.timezone.parse::<Zone>()?;

        // Validate log_level is a known level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.to_lowercase().as_str()) {
            return Err(Error::config(format!(
                "log_level must be one of {:?}, got '{}'",
                valid_levels, self.general.log_level
            )));
        }

        Ok(())
    }
}
