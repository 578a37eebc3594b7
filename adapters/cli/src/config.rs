//! Session settings gathered from command-line flags and an optional TOML file.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use tilemerge_system_spawning::{SpawnDistribution, CLASSIC_FOUR_PROBABILITY};
use tilemerge_world::WorldConfig;

use crate::session::ResetPolicy;

/// Partially specified settings; unset fields fall back to the next source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Overrides {
    pub(crate) seed: Option<u64>,
    pub(crate) four_probability: Option<f64>,
    pub(crate) reset_policy: Option<ResetPolicy>,
}

impl Overrides {
    /// Reads overrides from the TOML file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid session config")
    }

    /// Fills every unset field from `fallback`.
    pub(crate) fn or(self, fallback: Self) -> Self {
        Self {
            seed: self.seed.or(fallback.seed),
            four_probability: self.four_probability.or(fallback.four_probability),
            reset_policy: self.reset_policy.or(fallback.reset_policy),
        }
    }

    /// Resolves the final settings, drawing a seed from `fresh_seed` when none is set.
    pub(crate) fn resolve(self, fresh_seed: impl FnOnce() -> u64) -> Result<Settings> {
        let four_probability = self
            .four_probability
            .unwrap_or(CLASSIC_FOUR_PROBABILITY);
        let spawn = SpawnDistribution::new(four_probability)
            .context("invalid spawn weighting")?;
        let seed = self.seed.unwrap_or_else(fresh_seed);

        Ok(Settings {
            world: WorldConfig::new(seed, spawn),
            reset_policy: self.reset_policy.unwrap_or_default(),
        })
    }
}

/// Fully resolved settings for one run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) world: WorldConfig,
    pub(crate) reset_policy: ResetPolicy,
}
