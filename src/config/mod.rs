//! # Configuration Management Module
//!
//! Labbook keeps every tunable of every exercise in one TOML file so a run can
//! be reproduced from the file alone. Flags on the CLI override single values.
//!
//! ## Configuration Structure
//!
//! - [`LoggingConfig`] - Log level and optional log file
//! - [`StorageConfig`] - Data directory (adventure saves live below it)
//! - [`AdventureConfig`] - Data file paths, origin, special items and food
//! - [`SirParams`] - Epidemic model parameters
//! - [`NewtonConfig`], [`SequenceConfig`], [`DistributionConfig`] - Numeric labs
//! - [`DrawConfig`] - Team roster and time slots for the group draw
//!
//! ## Usage
//!
//! ```rust,no_run
//! use labbook::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("labbook.toml").await?;
//!     println!("Saves go to {}", config.saves_dir().display());
//!     Config::create_default("labbook.toml").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [logging]
//! level = "info"
//!
//! [storage]
//! data_dir = "./data"
//!
//! [adventure]
//! map_file = "data/adventure/map.txt"
//! origin = 1
//!
//! [sir]
//! susceptible = 50000.0
//! days = 200
//! ```
//!
//! Every exercise section may be omitted; missing values fall back to defaults.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

use crate::adventure::WorldRules;
use crate::labs::distribution::Statistic;
use crate::labs::draw::Team;
use crate::labs::newton::Polynomial;
use crate::labs::sequence::SequenceMap;
pub use crate::labs::sir::SirParams;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub adventure: AdventureConfig,
    #[serde(default)]
    pub sir: SirParams,
    #[serde(default)]
    pub newton: NewtonConfig,
    #[serde(default)]
    pub sequence: SequenceConfig,
    #[serde(default)]
    pub distribution: DistributionConfig,
    #[serde(default)]
    pub draw: DrawConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdventureConfig {
    pub map_file: String,
    pub locations_file: String,
    pub items_file: String,
    /// Location id the player starts on.
    pub origin: i32,
    /// Items locked until the player reaches their start location; once
    /// unlocked they can be picked up anywhere.
    pub special_items: Vec<String>,
    /// Items always eligible for pickup at their start location.
    pub food: Vec<String>,
}

impl Default for AdventureConfig {
    fn default() -> Self {
        AdventureConfig {
            map_file: "data/adventure/map.txt".to_string(),
            locations_file: "data/adventure/locations.txt".to_string(),
            items_file: "data/adventure/items.txt".to_string(),
            origin: crate::adventure::DEFAULT_ORIGIN,
            special_items: vec![
                "T-card".to_string(),
                "Lucky Pen".to_string(),
                "Cheat Sheet".to_string(),
            ],
            food: vec![
                "Broccoli with garlic".to_string(),
                "Greek salad".to_string(),
                "Chicken breast".to_string(),
            ],
        }
    }
}

impl AdventureConfig {
    pub fn rules(&self) -> WorldRules {
        WorldRules {
            origin: self.origin,
            special_items: self.special_items.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewtonConfig {
    /// Polynomial coefficients, highest degree first.
    pub coefficients: Vec<f64>,
    pub start: f64,
    pub iterations: usize,
    pub tolerance: f64,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        NewtonConfig {
            coefficients: Polynomial::default().coefficients,
            start: 1.0,
            iterations: 5,
            tolerance: 1e-12,
        }
    }
}

impl NewtonConfig {
    pub fn polynomial(&self) -> Polynomial {
        Polynomial::new(self.coefficients.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    pub start: f64,
    pub iterations: usize,
    /// Width of the dot plot in columns.
    pub plot_width: usize,
    pub map: SequenceMap,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        SequenceConfig {
            start: 0.4,
            iterations: 15,
            plot_width: 60,
            map: SequenceMap::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionConfig {
    pub values: Vec<f64>,
    pub probs: Vec<f64>,
    pub sample_size: usize,
    pub statistics: Vec<Statistic>,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        DistributionConfig {
            values: vec![15.0, 16.0, 17.0, 18.0],
            probs: vec![0.1, 0.2, 0.3, 0.4],
            sample_size: 3,
            statistics: vec![Statistic::Mean, Statistic::Median],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DrawConfig {
    pub time_slots: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub teams: Vec<Team>,
}

impl Config {
    /// Load configuration from a TOML file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Write the default configuration to `path`
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    /// Directory adventure saves are written to.
    pub fn saves_dir(&self) -> PathBuf {
        PathBuf::from(&self.storage.data_dir).join("saves")
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            logging: LoggingConfig {
                level: "info".to_string(),
                file: Some("labbook.log".to_string()),
            },
            storage: StorageConfig {
                data_dir: "./data".to_string(),
            },
            adventure: AdventureConfig::default(),
            sir: SirParams::default(),
            newton: NewtonConfig::default(),
            sequence: SequenceConfig::default(),
            distribution: DistributionConfig::default(),
            draw: DrawConfig::default(),
        }
    }
}
