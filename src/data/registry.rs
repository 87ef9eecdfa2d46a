//! Immutable team registry: validated competitors, their groups, venues and schedule.
//! Built once before a campaign and shared read-only (via `Arc` or `&`) with every pass.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::data::builtin::reference_catalog;
use crate::data::team::{load_catalog, CatalogFile, Competitor, Condition};
use crate::data::validate::{validate_catalog, ValidationReport, NEUTRAL_VENUE};
use crate::error::{Result, SimError};

/// Dense competitor handle: the catalog index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TeamId(pub usize);

impl TeamId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VenueProfile {
    pub name: String,
    pub favours: Condition,
    affinity: Vec<TeamId>,
}

impl VenueProfile {
    pub fn has_affinity(&self, team: TeamId) -> bool {
        self.affinity.contains(&team)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    /// Members in catalog order.
    pub members: Vec<TeamId>,
    venue: Option<usize>,
}

#[derive(Debug)]
pub struct TeamRegistry {
    teams: Vec<Competitor>,
    groups: Vec<Group>,
    venues: Vec<VenueProfile>,
    secondary_venue: Option<usize>,
    knockout_venue: Option<usize>,
    by_name: HashMap<String, TeamId>,
}

impl TeamRegistry {
    /// Validate and index a catalog. Any validation error refuses the catalog.
    pub fn from_catalog(catalog: CatalogFile) -> Result<Self> {
        let report = validate_catalog(&catalog);
        Self::check_report(&report)?;

        let by_name: HashMap<String, TeamId> = catalog
            .teams
            .iter()
            .enumerate()
            .map(|(index, team)| (team.name.clone(), TeamId(index)))
            .collect();

        let venues: Vec<VenueProfile> = catalog
            .venues
            .iter()
            .map(|spec| VenueProfile {
                name: spec.name.clone(),
                favours: spec.favours,
                affinity: spec
                    .affinity
                    .iter()
                    .filter_map(|team| by_name.get(team).copied())
                    .collect(),
            })
            .collect();
        let venue_index = |name: &str| venues.iter().position(|venue| venue.name == name);

        let mut groups: Vec<Group> = Vec::new();
        for (index, team) in catalog.teams.iter().enumerate() {
            match groups.iter_mut().find(|group| group.name == team.group) {
                Some(group) => group.members.push(TeamId(index)),
                None => groups.push(Group {
                    name: team.group.clone(),
                    members: vec![TeamId(index)],
                    venue: catalog
                        .schedule
                        .groups
                        .get(&team.group)
                        .and_then(|name| venue_index(name)),
                }),
            }
        }
        groups.sort_by(|left, right| left.name.cmp(&right.name));

        let secondary_venue = catalog.schedule.secondary.as_deref().and_then(venue_index);
        let knockout_venue = catalog.schedule.knockout.as_deref().and_then(venue_index);

        debug!(
            teams = catalog.teams.len(),
            groups = groups.len(),
            venues = venues.len(),
            "team registry built"
        );

        Ok(Self {
            teams: catalog.teams,
            groups,
            venues,
            secondary_venue,
            knockout_venue,
            by_name,
        })
    }

    /// Load a catalog file (YAML or JSON) and build the registry.
    pub fn load(path: impl AsRef<Path>) -> Result<Arc<Self>> {
        let catalog = load_catalog(path)?;
        Ok(Arc::new(Self::from_catalog(catalog)?))
    }

    /// The embedded reference catalog: twenty teams in four groups of five.
    pub fn builtin() -> Result<Arc<Self>> {
        Ok(Arc::new(Self::from_catalog(reference_catalog()?)?))
    }

    fn check_report(report: &ValidationReport) -> Result<()> {
        for diag in report.warnings() {
            warn!(context = %diag.context, "{}", diag.message);
        }
        if report.has_errors() {
            return Err(SimError::InvalidRegistry(
                report.errors().map(ToString::to_string).collect(),
            ));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn team(&self, id: TeamId) -> &Competitor {
        &self.teams[id.0]
    }

    pub fn name(&self, id: TeamId) -> &str {
        &self.teams[id.0].name
    }

    pub fn teams(&self) -> &[Competitor] {
        &self.teams
    }

    pub fn ids(&self) -> impl Iterator<Item = TeamId> + '_ {
        (0..self.teams.len()).map(TeamId)
    }

    pub fn id_of(&self, name: &str) -> Result<TeamId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| SimError::UnknownTeam(name.to_string()))
    }

    /// Groups sorted by name.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn venues(&self) -> &[VenueProfile] {
        &self.venues
    }

    /// Look up a venue by name. `neutral` resolves to `None`.
    pub fn venue(&self, name: &str) -> Result<Option<&VenueProfile>> {
        if name.eq_ignore_ascii_case(NEUTRAL_VENUE) {
            return Ok(None);
        }
        self.venues
            .iter()
            .find(|venue| venue.name == name)
            .map(Some)
            .ok_or_else(|| SimError::UnknownVenue(name.to_string()))
    }

    pub fn group_venue(&self, group: &Group) -> Option<&VenueProfile> {
        group.venue.map(|index| &self.venues[index])
    }

    pub fn secondary_venue(&self) -> Option<&VenueProfile> {
        self.secondary_venue.map(|index| &self.venues[index])
    }

    pub fn knockout_venue(&self) -> Option<&VenueProfile> {
        self.knockout_venue.map(|index| &self.venues[index])
    }
}
