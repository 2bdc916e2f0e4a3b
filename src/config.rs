//! Configuration: command-line flags plus an optional TOML settings file.
//!
//! The flags carry what the operator must decide (credential, rig, floor,
//! offset). The settings file carries tuning knobs that rarely change and
//! all of them have defaults, so the file itself is optional.

use anyhow::{Context, Result};
use clap::Parser;
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::display::DisplayMode;
use crate::platforms::betarigs::DEFAULT_BASE_URL;
use crate::strategy::pricing::PricingPolicy;
use crate::types::RigId;

/// Settings file read from the working directory when `--config` is absent.
pub const DEFAULT_SETTINGS_FILE: &str = "autoprice.toml";

/// Shortest accepted pause between cycles.
pub const MIN_CYCLE_INTERVAL_SECS: u64 = 1;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(
    name = "autoprice",
    version,
    about = "autoprice is a tool that helps you to rent your rig at the best price."
)]
pub struct Cli {
    /// Your Betarigs API key. (required)
    #[arg(long = "apiKey", env = "BETARIGS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Your rig ID. (required)
    #[arg(long = "rigId")]
    pub rig_id: Option<RigId>,

    /// The min price per speed unit for your rig. The rental price is never
    /// set below this limit. (required)
    #[arg(long = "minPrice")]
    pub min_price: Option<Decimal>,

    /// Percentage between the market price and the price you want to apply.
    /// 10 lists 10 percent above the market price, -10 lists 10 percent below.
    #[arg(long = "priceDiff", default_value = "0", allow_negative_numbers = true)]
    pub price_diff: Decimal,

    /// Settings file (TOML). Defaults to ./autoprice.toml when present.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// A required option missing or out of range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Option --{0} is missing")]
    Missing(&'static str),

    #[error("Option --{option} must be positive, got {value}")]
    NotPositive { option: &'static str, value: Decimal },
}

impl Cli {
    /// Check the required options, reporting every problem at once.
    pub fn validate(&self) -> Result<PricingConfig, Vec<ConfigError>> {
        let mut errors = Vec::new();

        let api_key = self.api_key.as_deref().filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            errors.push(ConfigError::Missing("apiKey"));
        }

        // Zero is what an unset numeric flag looks like to the operator.
        let rig_id = self.rig_id.filter(|id| *id != 0);
        if rig_id.is_none() {
            errors.push(ConfigError::Missing("rigId"));
        }

        let floor = match self.min_price {
            None => {
                errors.push(ConfigError::Missing("minPrice"));
                None
            }
            Some(p) if p.is_zero() => {
                errors.push(ConfigError::Missing("minPrice"));
                None
            }
            Some(p) if p.is_sign_negative() => {
                errors.push(ConfigError::NotPositive {
                    option: "minPrice",
                    value: p,
                });
                None
            }
            Some(p) => Some(p),
        };

        match (api_key, rig_id, floor) {
            (Some(key), Some(rig_id), Some(floor)) if errors.is_empty() => Ok(PricingConfig {
                api_key: SecretString::new(key.to_string()),
                rig_id,
                floor,
                offset_pct: self.price_diff,
            }),
            _ => Err(errors),
        }
    }
}

/// Operator choices, fixed for the lifetime of the process.
#[derive(Debug)]
pub struct PricingConfig {
    pub api_key: SecretString,
    pub rig_id: RigId,
    pub floor: Decimal,
    pub offset_pct: Decimal,
}

impl PricingConfig {
    pub fn policy(&self) -> PricingPolicy {
        PricingPolicy::new(self.floor, self.offset_pct)
    }
}

// ---------------------------------------------------------------------------
// Settings file
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub agent: AgentSettings,
    pub marketplace: MarketplaceSettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AgentSettings {
    pub cycle_interval_secs: u64,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            cycle_interval_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MarketplaceSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for MarketplaceSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            user_agent: format!("autoprice/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DisplaySettings {
    pub mode: DisplayMode,
}

impl Settings {
    /// Load settings.
    ///
    /// An explicit path must exist. Without one, `autoprice.toml` in the
    /// working directory is used if present, defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => p,
            None => {
                let default = Path::new(DEFAULT_SETTINGS_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let settings: Self = toml::from_str(contents)?;
        anyhow::ensure!(
            settings.agent.cycle_interval_secs >= MIN_CYCLE_INTERVAL_SECS,
            "agent.cycle_interval_secs must be at least {}, got {}",
            MIN_CYCLE_INTERVAL_SECS,
            settings.agent.cycle_interval_secs
        );
        Ok(settings)
    }

    pub fn cycle_interval(&self) -> Duration {
        Duration::from_secs(self.agent.cycle_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.marketplace.timeout_secs)
    }
}
