//! Stage-reach counters for every registry team, and their conversion to percentages.
//! The table is sized from the registry up front and merged by per-field sums, so partial
//! tallies from parallel workers combine in any order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::{TeamId, TeamRegistry};
use crate::tournament::PassResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageCounts {
    pub group_winner: u64,
    pub group_runner_up: u64,
    pub secondary_stage: u64,
    pub semi_final: u64,
    pub finalist: u64,
    pub champion: u64,
}

impl StageCounts {
    fn add(&mut self, other: &StageCounts) {
        self.group_winner += other.group_winner;
        self.group_runner_up += other.group_runner_up;
        self.secondary_stage += other.secondary_stage;
        self.semi_final += other.semi_final;
        self.finalist += other.finalist;
        self.champion += other.champion;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateCounts {
    counts: Vec<StageCounts>,
    passes: u64,
}

impl AggregateCounts {
    pub fn new(registry: &TeamRegistry) -> Self {
        Self::zeroed(registry.len())
    }

    pub fn zeroed(team_count: usize) -> Self {
        Self {
            counts: vec![StageCounts::default(); team_count],
            passes: 0,
        }
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn team_count(&self) -> usize {
        self.counts.len()
    }

    pub fn get(&self, team: TeamId) -> &StageCounts {
        &self.counts[team.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (TeamId, &StageCounts)> {
        self.counts
            .iter()
            .enumerate()
            .map(|(index, counts)| (TeamId(index), counts))
    }

    pub fn record(&mut self, pass: &PassResult) {
        for group in &pass.groups {
            self.counts[group.winner().index()].group_winner += 1;
            self.counts[group.runner_up().index()].group_runner_up += 1;
        }
        for team in &pass.qualifiers {
            self.counts[team.index()].secondary_stage += 1;
        }
        for team in pass.survivors() {
            self.counts[team.index()].semi_final += 1;
        }
        for team in pass.finalists() {
            self.counts[team.index()].finalist += 1;
        }
        self.counts[pass.champion().index()].champion += 1;
        self.passes += 1;
    }

    pub fn merged(mut self, other: AggregateCounts) -> Self {
        assert_eq!(
            self.counts.len(),
            other.counts.len(),
            "merging tallies built from different registries"
        );
        for (mine, theirs) in self.counts.iter_mut().zip(&other.counts) {
            mine.add(theirs);
        }
        self.passes += other.passes;
        self
    }

    /// Percent of completed passes, keyed by team name; every registry team is present.
    pub fn finalize(&self, registry: &TeamRegistry) -> BTreeMap<String, StageProbabilities> {
        self.iter()
            .map(|(team, counts)| {
                (
                    registry.name(team).to_string(),
                    StageProbabilities::from_counts(counts, self.passes),
                )
            })
            .collect()
    }
}

/// Output record per team, in percent. Key names are shared with the visualizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StageProbabilities {
    pub group_winner: f64,
    pub group_runner_up: f64,
    #[serde(rename = "super_8")]
    pub secondary_stage: f64,
    pub semi_final: f64,
    /// Observed share of passes in which the team played the final.
    #[serde(rename = "final")]
    pub finalist: f64,
    /// 2 × champion, the legacy approximation of `final`.
    pub derived_final: f64,
    pub champion: f64,
}

impl StageProbabilities {
    pub fn from_counts(counts: &StageCounts, passes: u64) -> Self {
        let percent = |count: u64| {
            if passes == 0 {
                0.0
            } else {
                count as f64 * 100.0 / passes as f64
            }
        };
        let champion = percent(counts.champion);
        Self {
            group_winner: percent(counts.group_winner),
            group_runner_up: percent(counts.group_runner_up),
            secondary_stage: percent(counts.secondary_stage),
            semi_final: percent(counts.semi_final),
            finalist: percent(counts.finalist),
            derived_final: (champion * 2.0).min(100.0),
            champion,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::config::SimulationConfig;
    use crate::tournament::TournamentSimulator;

    fn two_passes() -> (std::sync::Arc<TeamRegistry>, PassResult, PassResult) {
        let registry = TeamRegistry::builtin().unwrap();
        let simulator = TournamentSimulator::new(registry.clone(), &SimulationConfig::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let first = simulator.run_pass(&mut rng).unwrap();
        let second = simulator.run_pass(&mut rng).unwrap();
        (registry, first, second)
    }

    #[test]
    fn record_counts_each_stage_once_per_pass() {
        let (registry, pass, _) = two_passes();
        let mut counts = AggregateCounts::new(&registry);
        counts.record(&pass);

        let totals = counts.iter().fold(StageCounts::default(), |mut acc, (_, c)| {
            acc.add(c);
            acc
        });
        assert_eq!(totals.group_winner, 4);
        assert_eq!(totals.group_runner_up, 4);
        assert_eq!(totals.secondary_stage, 8);
        assert_eq!(totals.semi_final, 4);
        assert_eq!(totals.finalist, 2);
        assert_eq!(totals.champion, 1);
        assert_eq!(counts.passes(), 1);
    }

    #[test]
    fn merge_equals_sequential_recording() {
        let (registry, first, second) = two_passes();
        let mut sequential = AggregateCounts::new(&registry);
        sequential.record(&first);
        sequential.record(&second);

        let mut left = AggregateCounts::new(&registry);
        left.record(&second);
        let mut right = AggregateCounts::new(&registry);
        right.record(&first);

        assert_eq!(left.merged(right), sequential);
    }

    #[test]
    fn finalize_lists_every_team_even_without_counts() {
        let registry = TeamRegistry::builtin().unwrap();
        let empty = AggregateCounts::new(&registry);
        let table = empty.finalize(&registry);
        assert_eq!(table.len(), registry.len());
        assert!(table.values().all(|p| *p == StageProbabilities::default()));
    }

    #[test]
    fn probabilities_serialize_with_visualizer_keys() {
        let counts = StageCounts {
            group_winner: 5,
            group_runner_up: 2,
            secondary_stage: 7,
            semi_final: 4,
            finalist: 3,
            champion: 1,
        };
        let value = serde_json::to_value(StageProbabilities::from_counts(&counts, 10)).unwrap();
        assert_eq!(value["super_8"], 70.0);
        assert_eq!(value["final"], 30.0);
        assert_eq!(value["derived_final"], 20.0);
        assert_eq!(value["champion"], 10.0);
    }
}
