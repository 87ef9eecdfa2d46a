use rand::Rng;
use serde::Serialize;

use crate::config::FormatParams;
use crate::data::{TeamId, TeamRegistry};
use crate::error::Result;
use crate::model::MatchModel;
use crate::tournament::standings::{play_round_robin, RoundRobin};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupOutcome {
    pub group: String,
    pub table: RoundRobin,
}

impl GroupOutcome {
    pub fn winner(&self) -> TeamId {
        self.table.standings[0].team
    }

    pub fn runner_up(&self) -> TeamId {
        self.table.standings[1].team
    }
}

/// Play every group at its scheduled venue, in group-name order.
pub fn run_group_stage<R: Rng + ?Sized>(
    registry: &TeamRegistry,
    model: &MatchModel,
    format: &FormatParams,
    rng: &mut R,
) -> Result<Vec<GroupOutcome>> {
    let mut outcomes = Vec::with_capacity(registry.groups().len());
    for group in registry.groups() {
        let table = play_round_robin(
            registry,
            model,
            format,
            &group.members,
            registry.group_venue(group),
            rng,
        )?;
        outcomes.push(GroupOutcome {
            group: group.name.clone(),
            table,
        });
    }
    Ok(outcomes)
}

/// Top `qualifiers_per_group` of each group, grouped as [A1, A2, B1, B2, ...].
pub fn qualifiers(groups: &[GroupOutcome], format: &FormatParams) -> Vec<TeamId> {
    groups
        .iter()
        .flat_map(|outcome| outcome.table.top(format.qualifiers_per_group))
        .collect()
}
