use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::optimizer::{
    CostModel, TiePolicy, DEFAULT_ITERATIONS, DEFAULT_LAMBDA, DEFAULT_MAX_PASSES,
};

/// Looked up relative to the working directory when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub cost: CostConfig,
    #[validate(nested)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CostConfig {
    /// Severity weight of surcharge against dispersion
    #[validate(range(min = 0.0))]
    pub lambda: f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            lambda: DEFAULT_LAMBDA,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchConfig {
    /// Trial moves for hill climbing
    #[validate(range(min = 1))]
    pub iterations: usize,
    /// Seed for hill climbing; entropy when absent
    pub seed: Option<u64>,
    /// Pass cap for sequential descent
    #[validate(range(min = 1))]
    pub max_passes: usize,
    pub accept_ties: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            seed: None,
            max_passes: DEFAULT_MAX_PASSES,
            accept_ties: true,
        }
    }
}

impl SearchConfig {
    pub fn tie_policy(&self) -> TiePolicy {
        TiePolicy::from_accept_ties(self.accept_ties)
    }
}

impl Config {
    /// Defaults, then a TOML file, then `GRID__`-prefixed environment
    /// variables (`GRID__COST__LAMBDA=5`).
    ///
    /// An explicit `path` must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("config file {} does not exist", path.display());
                }
                path
            }
            None => Path::new(DEFAULT_CONFIG_PATH),
        };

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed("GRID__").split("__"));
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn cost_model(&self) -> Result<CostModel> {
        Ok(CostModel::new(self.cost.lambda)?)
    }
}
