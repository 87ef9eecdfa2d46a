//! Catalog file shapes: competitors, venues and the stage schedule as written on disk.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::read_structured;
use crate::error::Result;

/// A venue-dependent skill axis. Venues favour one of them when adjusting expected runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    #[default]
    Spin,
    Pace,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub name: String,
    #[serde(default)]
    pub group: String,
    /// World ranking position; 1 is strongest.
    pub ranking: u32,
    /// ELO-style rating.
    pub rating: f64,
    pub avg_runs_scored: f64,
    pub avg_runs_conceded: f64,
    /// Share of recent matches won, 0..=1.
    pub recent_win_rate: f64,
    pub player_strength: f64,
    pub spin_strength: f64,
    pub pace_strength: f64,
}

impl Competitor {
    pub fn condition_strength(&self, condition: Condition) -> f64 {
        match condition {
            Condition::Spin => self.spin_strength,
            Condition::Pace => self.pace_strength,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueSpec {
    pub name: String,
    #[serde(default)]
    pub favours: Condition,
    /// Teams receiving the home-affinity win-probability boost here.
    #[serde(default)]
    pub affinity: Vec<String>,
}

/// Where each stage is played. Missing entries are neutral.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSpec {
    #[serde(default)]
    pub groups: BTreeMap<String, String>,
    #[serde(default)]
    pub secondary: Option<String>,
    #[serde(default)]
    pub knockout: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogFile {
    pub teams: Vec<Competitor>,
    #[serde(default)]
    pub venues: Vec<VenueSpec>,
    #[serde(default)]
    pub schedule: ScheduleSpec,
}

pub fn load_catalog(path: impl AsRef<Path>) -> Result<CatalogFile> {
    read_structured(path.as_ref())
}
