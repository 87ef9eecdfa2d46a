//! Round-robin tables and their ordering.
//!
//! Order: points desc, differential desc, head-to-head wins inside the tied block desc,
//! ranking position asc, catalog order.

use std::cmp::Ordering;

use rand::Rng;
use serde::Serialize;

use crate::config::FormatParams;
use crate::data::{TeamId, TeamRegistry, VenueProfile};
use crate::error::Result;
use crate::model::{Contender, MatchModel, MatchResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageStanding {
    pub team: TeamId,
    pub points: u32,
    /// Sum of (own − opponent score) / normalizer over the stage.
    pub differential: f64,
    pub played: u32,
    pub won: u32,
}

impl StageStanding {
    fn new(team: TeamId) -> Self {
        Self {
            team,
            points: 0,
            differential: 0.0,
            played: 0,
            won: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundRobin {
    /// Ranked, best first.
    pub standings: Vec<StageStanding>,
    pub matches: Vec<MatchResult>,
}

impl RoundRobin {
    pub fn top(&self, count: usize) -> impl Iterator<Item = TeamId> + '_ {
        self.standings.iter().take(count).map(|standing| standing.team)
    }

    pub fn total_points(&self) -> u32 {
        self.standings.iter().map(|standing| standing.points).sum()
    }
}

/// Every pair of `members` meets once at `venue`; the table comes back ranked.
pub fn play_round_robin<R: Rng + ?Sized>(
    registry: &TeamRegistry,
    model: &MatchModel,
    format: &FormatParams,
    members: &[TeamId],
    venue: Option<&VenueProfile>,
    rng: &mut R,
) -> Result<RoundRobin> {
    let mut standings: Vec<StageStanding> = members.iter().copied().map(StageStanding::new).collect();
    let mut matches = Vec::with_capacity(members.len() * members.len().saturating_sub(1) / 2);

    for i in 0..members.len() {
        for j in (i + 1)..members.len() {
            let first = Contender::of(registry, members[i]);
            let second = Contender::of(registry, members[j]);
            let result = model.simulate_match(first, second, venue, rng)?;

            for (index, team) in [(i, members[i]), (j, members[j])] {
                let standing = &mut standings[index];
                standing.played += 1;
                standing.differential += result.margin_for(team) as f64 / format.differential_normalizer;
                if result.winner == team {
                    standing.won += 1;
                    standing.points += format.points_per_win;
                }
            }
            matches.push(result);
        }
    }

    rank_standings(&mut standings, &matches, registry);
    Ok(RoundRobin { standings, matches })
}

/// Sort a table in place using the tie-break chain in the module docs.
pub fn rank_standings(standings: &mut [StageStanding], matches: &[MatchResult], registry: &TeamRegistry) {
    standings.sort_by(compare_primary);

    let mut start = 0;
    while start < standings.len() {
        let mut end = start + 1;
        while end < standings.len() && compare_primary(&standings[start], &standings[end]).is_eq() {
            end += 1;
        }
        if end - start > 1 {
            break_tie(&mut standings[start..end], matches, registry);
        }
        start = end;
    }
}

fn compare_primary(left: &StageStanding, right: &StageStanding) -> Ordering {
    right
        .points
        .cmp(&left.points)
        .then_with(|| right.differential.total_cmp(&left.differential))
}

fn break_tie(block: &mut [StageStanding], matches: &[MatchResult], registry: &TeamRegistry) {
    let tied: Vec<TeamId> = block.iter().map(|standing| standing.team).collect();
    let head_to_head = |team: TeamId| {
        matches
            .iter()
            .filter(|m| m.winner == team && tied.contains(&m.loser()))
            .count()
    };
    block.sort_by(|left, right| {
        head_to_head(right.team)
            .cmp(&head_to_head(left.team))
            .then_with(|| registry.team(left.team).ranking.cmp(&registry.team(right.team).ranking))
            .then_with(|| left.team.cmp(&right.team))
    });
}
