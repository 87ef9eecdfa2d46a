use std::sync::Arc;

use rand::Rng;
use serde::Serialize;

use crate::config::{FormatParams, SecondaryDraw, SimulationConfig};
use crate::data::{TeamId, TeamRegistry};
use crate::error::{Result, SimError};
use crate::model::MatchModel;
use crate::tournament::group::{qualifiers, run_group_stage, GroupOutcome};
use crate::tournament::knockout::{run_knockout, KnockoutOutcome};
use crate::tournament::secondary::{run_secondary_stage, SecondaryOutcome};

/// One simulated tournament, group stage to champion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassResult {
    pub groups: Vec<GroupOutcome>,
    pub qualifiers: Vec<TeamId>,
    pub secondary: SecondaryOutcome,
    pub knockout: KnockoutOutcome,
}

impl PassResult {
    /// Secondary-stage survivors, i.e. the semi-finalists.
    pub fn survivors(&self) -> &[TeamId] {
        &self.secondary.survivors
    }

    pub fn finalists(&self) -> [TeamId; 2] {
        self.knockout.finalists()
    }

    pub fn champion(&self) -> TeamId {
        self.knockout.champion()
    }
}

/// Runs complete tournament passes over a shared registry.
#[derive(Debug, Clone)]
pub struct TournamentSimulator {
    registry: Arc<TeamRegistry>,
    model: MatchModel,
    format: FormatParams,
}

impl TournamentSimulator {
    /// Rejects invalid parameters and bracket shapes before any pass can run.
    pub fn new(registry: Arc<TeamRegistry>, config: &SimulationConfig) -> Result<Self> {
        config.validate()?;
        check_bracket(&registry, &config.format)?;
        Ok(Self {
            registry,
            model: MatchModel::new(config.model.clone()),
            format: config.format.clone(),
        })
    }

    pub fn registry(&self) -> &Arc<TeamRegistry> {
        &self.registry
    }

    pub fn model(&self) -> &MatchModel {
        &self.model
    }

    pub fn format(&self) -> &FormatParams {
        &self.format
    }

    /// Group stage, secondary stage, knockouts. Every match is freshly simulated.
    pub fn run_pass<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<PassResult> {
        let registry = self.registry.as_ref();
        let groups = run_group_stage(registry, &self.model, &self.format, rng)?;
        let qualifiers = qualifiers(&groups, &self.format);
        let secondary = run_secondary_stage(registry, &self.model, &self.format, &qualifiers, rng)?;

        let survivors: &[TeamId; 4] = secondary.survivors.as_slice().try_into().map_err(|_| {
            SimError::InvalidConfig(format!(
                "secondary stage produced {} survivors, expected 4",
                secondary.survivors.len()
            ))
        })?;
        let knockout = run_knockout(registry, &self.model, survivors, rng)?;

        Ok(PassResult {
            groups,
            qualifiers,
            secondary,
            knockout,
        })
    }
}

/// The bracket must feed two equal secondary pools, each big enough to send two through.
fn check_bracket(registry: &TeamRegistry, format: &FormatParams) -> Result<()> {
    let per_group = format.qualifiers_per_group;
    if let Some(group) = registry
        .groups()
        .iter()
        .find(|group| group.members.len() < per_group.max(2))
    {
        return Err(SimError::InvalidConfig(format!(
            "group '{}' has {} teams but {} qualify",
            group.name,
            group.members.len(),
            per_group
        )));
    }

    let group_count = registry.groups().len();
    let total = group_count * per_group;
    if total % 2 != 0 {
        return Err(SimError::InvalidConfig(format!(
            "{total} qualifiers cannot be split into two equal pools"
        )));
    }
    if format.secondary_draw == SecondaryDraw::Seeded && per_group % 2 == 1 && group_count % 2 == 1 {
        return Err(SimError::InvalidConfig(
            "seeded secondary draw needs an even number of groups".to_string(),
        ));
    }
    if total / 2 < format.survivors_per_pool {
        return Err(SimError::InvalidConfig(format!(
            "secondary pools of {} cannot send {} through",
            total / 2,
            format.survivors_per_pool
        )));
    }
    Ok(())
}

/// Names instead of handles, for printing a single pass.
#[derive(Debug, Clone, Serialize)]
pub struct NamedPass {
    pub groups: Vec<NamedGroup>,
    pub qualifiers: Vec<String>,
    pub secondary_pools: [Vec<NamedStanding>; 2],
    pub semi_finalists: Vec<String>,
    pub finalists: [String; 2],
    pub champion: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NamedGroup {
    pub group: String,
    pub standings: Vec<NamedStanding>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NamedStanding {
    pub team: String,
    pub points: u32,
    pub differential: f64,
    pub won: u32,
    pub played: u32,
}

impl PassResult {
    pub fn named(&self, registry: &TeamRegistry) -> NamedPass {
        let name = |id: TeamId| registry.name(id).to_string();
        let table = |round_robin: &crate::tournament::standings::RoundRobin| {
            round_robin
                .standings
                .iter()
                .map(|standing| NamedStanding {
                    team: name(standing.team),
                    points: standing.points,
                    differential: standing.differential,
                    won: standing.won,
                    played: standing.played,
                })
                .collect::<Vec<_>>()
        };
        let [first, second] = self.finalists();

        NamedPass {
            groups: self
                .groups
                .iter()
                .map(|outcome| NamedGroup {
                    group: outcome.group.clone(),
                    standings: table(&outcome.table),
                })
                .collect(),
            qualifiers: self.qualifiers.iter().copied().map(name).collect(),
            secondary_pools: [table(&self.secondary.pools[0]), table(&self.secondary.pools[1])],
            semi_finalists: self.survivors().iter().copied().map(name).collect(),
            finalists: [name(first), name(second)],
            champion: name(self.champion()),
        }
    }
}
