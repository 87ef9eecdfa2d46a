pub mod probability;
pub mod rng;
pub mod scoring;

use crate::config::ModelParams;
use crate::data::{Competitor, TeamId, TeamRegistry};

pub use probability::{ProbabilityTerms, Toss};
pub use rng::{random_master_seed, PassRng, SeedStream};
pub use scoring::MatchResult;

/// One side of a fixture: its registry handle plus attributes.
#[derive(Debug, Clone, Copy)]
pub struct Contender<'a> {
    pub id: TeamId,
    pub team: &'a Competitor,
}

impl<'a> Contender<'a> {
    pub fn of(registry: &'a TeamRegistry, id: TeamId) -> Self {
        Self {
            id,
            team: registry.team(id),
        }
    }
}

/// Turns team attributes into win probabilities and simulated scorecards.
/// Stateless apart from its parameters; safe to share across workers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchModel {
    params: ModelParams,
}

impl MatchModel {
    pub fn new(params: ModelParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }
}
