use rand::Rng;
use serde::Serialize;

use crate::data::{TeamId, TeamRegistry};
use crate::error::Result;
use crate::model::{Contender, MatchModel, MatchResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnockoutOutcome {
    pub semi_finals: [MatchResult; 2],
    pub final_match: MatchResult,
}

impl KnockoutOutcome {
    pub fn finalists(&self) -> [TeamId; 2] {
        [self.semi_finals[0].winner, self.semi_finals[1].winner]
    }

    pub fn champion(&self) -> TeamId {
        self.final_match.winner
    }
}

/// Semis pair bracket positions 0–1 and 2–3; their winners meet in the final.
/// Every tie is played at the knockout venue and nothing is re-seeded between rounds.
pub fn run_knockout<R: Rng + ?Sized>(
    registry: &TeamRegistry,
    model: &MatchModel,
    survivors: &[TeamId; 4],
    rng: &mut R,
) -> Result<KnockoutOutcome> {
    let venue = registry.knockout_venue();
    let play = |first: TeamId, second: TeamId, rng: &mut R| {
        model.simulate_match(
            Contender::of(registry, first),
            Contender::of(registry, second),
            venue,
            rng,
        )
    };

    let semi_one = play(survivors[0], survivors[1], &mut *rng)?;
    let semi_two = play(survivors[2], survivors[3], &mut *rng)?;
    let final_match = play(semi_one.winner, semi_two.winner, rng)?;

    Ok(KnockoutOutcome {
        semi_finals: [semi_one, semi_two],
        final_match,
    })
}
