//! Simulation parameters: match model constants, tournament format and campaign knobs.
//! Defaults reproduce the reference T20 model; a YAML or JSON file may override any field,
//! and `BRACKET_ODDS_*` environment variables override the campaign section last.

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::data::read_structured;
use crate::error::{Result, SimError};

pub const ENV_PASSES: &str = "BRACKET_ODDS_PASSES";
pub const ENV_SEED: &str = "BRACKET_ODDS_SEED";
pub const ENV_WORKERS: &str = "BRACKET_ODDS_WORKERS";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub model: ModelParams,
    pub format: FormatParams,
    pub campaign: CampaignParams,
}

/// Weights of the four win-probability terms. Expected to sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TermWeights {
    pub rating: f64,
    pub form: f64,
    pub ranking: f64,
    pub player_strength: f64,
}

impl Default for TermWeights {
    fn default() -> Self {
        Self {
            rating: 0.35,
            form: 0.25,
            ranking: 0.25,
            player_strength: 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    pub weights: TermWeights,
    /// Rating gap giving 10:1 odds.
    pub rating_divisor: f64,
    /// Ranking-term change per ranking place.
    pub ranking_step: f64,
    pub affinity_boost: f64,
    pub toss_factor: f64,
    /// Runs a side concedes on average across the league.
    pub league_baseline: f64,
    /// Fractional lambda swing for the side with the stronger venue condition.
    pub condition_edge: f64,
    pub toss_bonus_min: u32,
    pub toss_bonus_max: u32,
    pub min_score: u32,
    pub max_score: u32,
    pub probability_floor: f64,
    pub probability_ceiling: f64,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            weights: TermWeights::default(),
            rating_divisor: 400.0,
            ranking_step: 0.02,
            affinity_boost: 1.08,
            toss_factor: 1.03,
            league_baseline: 160.0,
            condition_edge: 0.03,
            toss_bonus_min: 5,
            toss_bonus_max: 8,
            min_score: 100,
            max_score: 250,
            probability_floor: 0.01,
            probability_ceiling: 0.99,
        }
    }
}

/// How the secondary-stage pools are formed from the group qualifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryDraw {
    /// Shuffle the qualifiers and cut the list in half.
    #[default]
    Random,
    /// Cross-pool seeding: winners of even groups with runners-up of odd groups.
    Seeded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatParams {
    pub points_per_win: u32,
    pub differential_normalizer: f64,
    pub qualifiers_per_group: usize,
    pub survivors_per_pool: usize,
    pub secondary_draw: SecondaryDraw,
}

impl Default for FormatParams {
    fn default() -> Self {
        Self {
            points_per_win: 2,
            differential_normalizer: 20.0,
            qualifiers_per_group: 2,
            survivors_per_pool: 2,
            secondary_draw: SecondaryDraw::Random,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignParams {
    pub passes: usize,
    /// Master seed. When None a random seed is drawn and reported.
    pub seed: Option<u64>,
    /// Worker threads; 0 uses the global rayon pool.
    pub workers: usize,
    /// Passes between progress notifications.
    pub progress_every: usize,
}

impl Default for CampaignParams {
    fn default() -> Self {
        Self {
            passes: 10_000,
            seed: None,
            workers: 0,
            progress_every: 1_000,
        }
    }
}

impl SimulationConfig {
    /// Load from a YAML/JSON file, apply environment overrides, then validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let mut config: SimulationConfig = read_structured(path.as_ref())?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self> {
        let mut config = SimulationConfig::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Some(passes) = env_number::<usize>(ENV_PASSES) {
            self.campaign.passes = passes;
        }
        if let Some(seed) = env_number::<u64>(ENV_SEED) {
            self.campaign.seed = Some(seed);
        }
        if let Some(workers) = env_number::<usize>(ENV_WORKERS) {
            self.campaign.workers = workers;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let model = &self.model;
        let format = &self.format;
        let mut problems = Vec::new();

        if !(model.rating_divisor.is_finite() && model.rating_divisor > 0.0) {
            problems.push("model.rating_divisor must be positive".to_string());
        }
        if !(model.league_baseline.is_finite() && model.league_baseline > 0.0) {
            problems.push("model.league_baseline must be positive".to_string());
        }
        if !(model.affinity_boost.is_finite() && model.affinity_boost > 0.0) {
            problems.push("model.affinity_boost must be positive".to_string());
        }
        if !(model.toss_factor.is_finite() && model.toss_factor > 0.0) {
            problems.push("model.toss_factor must be positive".to_string());
        }
        if !(0.0..1.0).contains(&model.condition_edge) {
            problems.push("model.condition_edge must lie in [0, 1)".to_string());
        }
        if model.toss_bonus_min > model.toss_bonus_max {
            problems.push("model.toss_bonus_min exceeds toss_bonus_max".to_string());
        }
        if model.min_score >= model.max_score {
            problems.push("model.min_score must be below max_score".to_string());
        }
        if !(0.0 < model.probability_floor
            && model.probability_floor < model.probability_ceiling
            && model.probability_ceiling < 1.0)
        {
            problems.push("model probability clamp must satisfy 0 < floor < ceiling < 1".to_string());
        }
        let weights = model.weights;
        let weight_sum = weights.rating + weights.form + weights.ranking + weights.player_strength;
        if [weights.rating, weights.form, weights.ranking, weights.player_strength]
            .iter()
            .any(|w| !w.is_finite() || *w < 0.0)
        {
            problems.push("model.weights must be finite and non-negative".to_string());
        } else if (weight_sum - 1.0).abs() > 1e-6 {
            warn!(weight_sum, "win-probability weights do not sum to 1");
        }

        if format.points_per_win == 0 {
            problems.push("format.points_per_win must be positive".to_string());
        }
        if !(format.differential_normalizer.is_finite() && format.differential_normalizer > 0.0) {
            problems.push("format.differential_normalizer must be positive".to_string());
        }
        if format.qualifiers_per_group == 0 {
            problems.push("format.qualifiers_per_group must be positive".to_string());
        }
        if format.survivors_per_pool != 2 {
            problems.push("format.survivors_per_pool must be 2 (fixed four-team knockout)".to_string());
        }
        if self.campaign.passes == 0 {
            problems.push("campaign.passes must be positive".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(SimError::InvalidConfig(problems.join("; ")))
        }
    }
}

fn env_number<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable environment override");
            None
        }
    }
}
