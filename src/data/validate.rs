use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::data::team::{CatalogFile, Competitor};

/// Reference bracket: four groups of five.
pub const REFERENCE_GROUP_COUNT: usize = 4;
pub const REFERENCE_GROUP_SIZE: usize = 5;

/// Venue name reserved for "no venue effects".
pub const NEUTRAL_VENUE: &str = "neutral";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == ValidationSeverity::Warning)
    }
}

/// Check a catalog before any pass runs. Errors block the campaign; warnings do not.
pub fn validate_catalog(catalog: &CatalogFile) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut seen_names = HashSet::new();
    let mut group_sizes: BTreeMap<&str, usize> = BTreeMap::new();

    for (index, team) in catalog.teams.iter().enumerate() {
        let context = if team.name.trim().is_empty() {
            format!("teams[{index}]")
        } else {
            format!("teams[{index}] '{}'", team.name)
        };

        if team.name.trim().is_empty() {
            report.push(ValidationSeverity::Error, &context, "missing non-empty 'name'");
        } else if !seen_names.insert(team.name.as_str()) {
            report.push(
                ValidationSeverity::Error,
                &context,
                format!("duplicate name '{}'", team.name),
            );
        }

        if team.group.trim().is_empty() {
            report.push(ValidationSeverity::Error, &context, "missing group assignment");
        } else {
            *group_sizes.entry(team.group.as_str()).or_default() += 1;
        }

        validate_attributes(&mut report, &context, team);
    }

    for (group, size) in &group_sizes {
        if *size < 2 {
            report.push(
                ValidationSeverity::Error,
                format!("group '{group}'"),
                format!("needs at least 2 competitors, found {size}"),
            );
        }
    }
    if group_sizes.len() < 2 {
        report.push(
            ValidationSeverity::Error,
            "teams",
            format!("needs at least 2 groups, found {}", group_sizes.len()),
        );
    }
    let reference_shape = group_sizes.len() == REFERENCE_GROUP_COUNT
        && group_sizes.values().all(|size| *size == REFERENCE_GROUP_SIZE);
    if !reference_shape && !group_sizes.is_empty() {
        report.push(
            ValidationSeverity::Warning,
            "teams",
            format!(
                "bracket differs from the reference {REFERENCE_GROUP_COUNT} groups of {REFERENCE_GROUP_SIZE}"
            ),
        );
    }

    validate_venues(&mut report, catalog, &seen_names, &group_sizes);
    report
}

fn validate_attributes(report: &mut ValidationReport, context: &str, team: &Competitor) {
    if !(team.rating.is_finite() && team.rating > 0.0) {
        report.push(
            ValidationSeverity::Error,
            format!("{context}.rating"),
            format!("must be a positive number, got {}", team.rating),
        );
    }
    if team.ranking == 0 {
        report.push(
            ValidationSeverity::Error,
            format!("{context}.ranking"),
            "ranking positions start at 1",
        );
    }
    for (field, value) in [
        ("avg_runs_scored", team.avg_runs_scored),
        ("avg_runs_conceded", team.avg_runs_conceded),
    ] {
        if !(value.is_finite() && value > 0.0) {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.{field}"),
                format!("must be a positive number, got {value}"),
            );
        }
    }
    for (field, value) in [
        ("recent_win_rate", team.recent_win_rate),
        ("player_strength", team.player_strength),
        ("spin_strength", team.spin_strength),
        ("pace_strength", team.pace_strength),
    ] {
        if !(0.0..=1.0).contains(&value) {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.{field}"),
                format!("must lie in [0, 1], got {value}"),
            );
        }
    }
}

fn validate_venues(
    report: &mut ValidationReport,
    catalog: &CatalogFile,
    team_names: &HashSet<&str>,
    group_sizes: &BTreeMap<&str, usize>,
) {
    let mut venue_names = HashSet::new();
    for (index, venue) in catalog.venues.iter().enumerate() {
        let context = format!("venues[{index}] '{}'", venue.name);
        if venue.name.trim().is_empty() || venue.name.eq_ignore_ascii_case(NEUTRAL_VENUE) {
            report.push(
                ValidationSeverity::Error,
                &context,
                format!("venue name must be non-empty and not '{NEUTRAL_VENUE}'"),
            );
        } else if !venue_names.insert(venue.name.as_str()) {
            report.push(ValidationSeverity::Error, &context, "duplicate venue name");
        }
        for team in &venue.affinity {
            if !team_names.contains(team.as_str()) {
                report.push(
                    ValidationSeverity::Error,
                    format!("{context}.affinity"),
                    format!("unknown team '{team}'"),
                );
            }
        }
    }

    let schedule = &catalog.schedule;
    for (group, venue) in &schedule.groups {
        if !group_sizes.contains_key(group.as_str()) {
            report.push(
                ValidationSeverity::Error,
                format!("schedule.groups.{group}"),
                "unknown group",
            );
        }
        check_scheduled_venue(report, &format!("schedule.groups.{group}"), venue, &venue_names);
    }
    for group in group_sizes.keys() {
        if !schedule.groups.contains_key(*group) {
            report.push(
                ValidationSeverity::Warning,
                format!("schedule.groups.{group}"),
                "no venue scheduled; group plays at a neutral venue",
            );
        }
    }
    if let Some(venue) = &schedule.secondary {
        check_scheduled_venue(report, "schedule.secondary", venue, &venue_names);
    }
    if let Some(venue) = &schedule.knockout {
        check_scheduled_venue(report, "schedule.knockout", venue, &venue_names);
    }
}

fn check_scheduled_venue(
    report: &mut ValidationReport,
    context: &str,
    venue: &str,
    venue_names: &HashSet<&str>,
) {
    if !venue.eq_ignore_ascii_case(NEUTRAL_VENUE) && !venue_names.contains(venue) {
        report.push(
            ValidationSeverity::Error,
            context,
            format!("unknown venue '{venue}'"),
        );
    }
}
