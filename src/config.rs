//! Household configuration loaded from a TOML file.
//!
//! Every key is optional:
//!
//! ```toml
//! roommates = ["IBRAHIM", "TAHA", "AMJID", "ADNAN"]
//! currency_symbol = "₨"
//! allow_negative_deposits = false
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::application::AppError;
use crate::domain::Roster;

pub const DEFAULT_CURRENCY_SYMBOL: &str = "₨";

/// Settings fixed for the lifetime of a session.
#[derive(Debug, Clone)]
pub struct Config {
    /// Who lives in the household
    pub roster: Roster,
    /// Printed in front of amounts
    pub currency_symbol: String,
    /// Whether negative deposits are accepted as correction entries
    pub allow_negative_deposits: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            roster: Roster::default(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            allow_negative_deposits: false,
        }
    }
}

/// Raw file contents before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    roommates: Option<Vec<String>>,
    currency_symbol: Option<String>,
    allow_negative_deposits: Option<bool>,
}

impl Config {
    /// Load configuration from `path`, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let Some(path) = path else {
            debug!("No configuration file given, using defaults");
            return Ok(Self::default());
        };

        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&contents)?;

        info!(
            path = %path.display(),
            roommates = config.roster.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse configuration from TOML text, filling gaps with defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, AppError> {
        let file: ConfigFile = toml::from_str(contents)
            .map_err(|e| AppError::Config(format!("Failed to parse configuration: {}", e)))?;

        let defaults = Self::default();
        let roster = match file.roommates {
            Some(names) => Roster::new(names)?,
            None => defaults.roster,
        };

        Ok(Self {
            roster,
            currency_symbol: file
                .currency_symbol
                .unwrap_or(defaults.currency_symbol),
            allow_negative_deposits: file
                .allow_negative_deposits
                .unwrap_or(defaults.allow_negative_deposits),
        })
    }
}
