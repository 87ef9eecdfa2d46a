//! Secondary round-robin stage: qualifiers split into two pools, top two of each advance.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::config::{FormatParams, SecondaryDraw};
use crate::data::{TeamId, TeamRegistry};
use crate::error::Result;
use crate::model::MatchModel;
use crate::tournament::standings::{play_round_robin, RoundRobin};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecondaryOutcome {
    pub pools: [RoundRobin; 2],
    /// [pool 1 first, pool 1 second, pool 2 first, pool 2 second]
    pub survivors: Vec<TeamId>,
}

/// Split qualifiers (ordered by group, best first within a group) into two equal pools.
pub fn draw_pools<R: Rng + ?Sized>(
    qualifiers: &[TeamId],
    format: &FormatParams,
    rng: &mut R,
) -> [Vec<TeamId>; 2] {
    match format.secondary_draw {
        SecondaryDraw::Random => {
            let mut shuffled = qualifiers.to_vec();
            shuffled.shuffle(rng);
            let second = shuffled.split_off(shuffled.len() / 2);
            [shuffled, second]
        }
        SecondaryDraw::Seeded => {
            let per_group = format.qualifiers_per_group.max(1);
            let mut pools = [Vec::new(), Vec::new()];
            for (index, team) in qualifiers.iter().enumerate() {
                let group_index = index / per_group;
                let position = index % per_group;
                pools[(group_index + position) % 2].push(*team);
            }
            pools
        }
    }
}

pub fn run_secondary_stage<R: Rng + ?Sized>(
    registry: &TeamRegistry,
    model: &MatchModel,
    format: &FormatParams,
    qualifiers: &[TeamId],
    rng: &mut R,
) -> Result<SecondaryOutcome> {
    let [first_pool, second_pool] = draw_pools(qualifiers, format, rng);
    let venue = registry.secondary_venue();

    let first = play_round_robin(registry, model, format, &first_pool, venue, rng)?;
    let second = play_round_robin(registry, model, format, &second_pool, venue, rng)?;

    let survivors = first
        .top(format.survivors_per_pool)
        .chain(second.top(format.survivors_per_pool))
        .collect();

    Ok(SecondaryOutcome {
        pools: [first, second],
        survivors,
    })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn ids(range: std::ops::Range<usize>) -> Vec<TeamId> {
        range.map(TeamId).collect()
    }

    #[test]
    fn seeded_draw_crosses_winners_and_runners_up() {
        let format = FormatParams {
            secondary_draw: SecondaryDraw::Seeded,
            ..FormatParams::default()
        };
        // [A1, A2, B1, B2, C1, C2, D1, D2]
        let qualifiers = ids(0..8);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let [first, second] = draw_pools(&qualifiers, &format, &mut rng);
        assert_eq!(first, vec![TeamId(0), TeamId(3), TeamId(4), TeamId(7)]);
        assert_eq!(second, vec![TeamId(1), TeamId(2), TeamId(5), TeamId(6)]);
    }

    #[test]
    fn random_draw_is_an_even_partition() {
        let format = FormatParams::default();
        let qualifiers = ids(10..18);
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let [first, second] = draw_pools(&qualifiers, &format, &mut rng);
        assert_eq!(first.len(), 4);
        assert_eq!(second.len(), 4);
        let mut all: Vec<TeamId> = first.into_iter().chain(second).collect();
        all.sort();
        assert_eq!(all, qualifiers);
    }
}
