//! Campaign output contract: one percentage record per registry team, as JSON, CSV or a
//! plain-text table. Visualizers read the JSON form, so its key names are stable.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::campaign::{CampaignOutcome, StageProbabilities};
use crate::data::TeamRegistry;
use crate::error::{Result, SimError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignReport {
    /// RFC 3339 UTC timestamp.
    pub generated_at: String,
    pub seed: u64,
    pub passes_requested: u64,
    pub passes_completed: u64,
    pub cancelled: bool,
    pub teams: BTreeMap<String, StageProbabilities>,
}

impl CampaignReport {
    pub fn from_outcome(outcome: &CampaignOutcome, registry: &TeamRegistry) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            seed: outcome.seed,
            passes_requested: outcome.requested,
            passes_completed: outcome.completed(),
            cancelled: outcome.cancelled,
            teams: outcome.counts.finalize(registry),
        }
    }

    /// Teams by champion percentage, then semi-final percentage, then name.
    pub fn ranked_by_champion(&self) -> Vec<(&str, &StageProbabilities)> {
        let mut ranked: Vec<(&str, &StageProbabilities)> = self
            .teams
            .iter()
            .map(|(name, probabilities)| (name.as_str(), probabilities))
            .collect();
        ranked.sort_by(|(left_name, left), (right_name, right)| {
            right
                .champion
                .total_cmp(&left.champion)
                .then_with(|| right.semi_final.total_cmp(&left.semi_final))
                .then_with(|| left_name.cmp(right_name))
        });
        ranked
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|err| SimError::Export(err.to_string()))
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let payload = self.to_json()?;
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| SimError::io(parent, err))?;
        }
        fs::write(path, payload).map_err(|err| SimError::io(path, err))
    }

    /// One CSV row per team, in champion order.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record([
            "team",
            "group_winner",
            "group_runner_up",
            "super_8",
            "semi_final",
            "final",
            "derived_final",
            "champion",
        ])?;
        for (team, p) in self.ranked_by_champion() {
            csv.write_record([
                team.to_string(),
                format!("{:.4}", p.group_winner),
                format!("{:.4}", p.group_runner_up),
                format!("{:.4}", p.secondary_stage),
                format!("{:.4}", p.semi_final),
                format!("{:.4}", p.finalist),
                format!("{:.4}", p.derived_final),
                format!("{:.4}", p.champion),
            ])?;
        }
        csv.flush().map_err(|err| SimError::Export(err.to_string()))
    }

    pub fn write_csv_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = fs::File::create(path).map_err(|err| SimError::io(path, err))?;
        self.write_csv(file)
    }

    pub fn render_table(&self) -> String {
        let mut lines = vec![format!(
            "{:<4} {:<24} {:>8} {:>8} {:>8} {:>8}",
            "rank", "team", "win%", "final%", "semi%", "super8%"
        )];
        lines.extend(
            self.ranked_by_champion()
                .into_iter()
                .enumerate()
                .map(|(rank, (team, p))| {
                    format!(
                        "{:<4} {:<24} {:>8.2} {:>8.2} {:>8.2} {:>8.2}",
                        rank + 1,
                        team,
                        p.champion,
                        p.finalist,
                        p.semi_final,
                        p.secondary_stage
                    )
                }),
        );
        lines.push(format!(
            "passes={}/{} seed={}{}",
            self.passes_completed,
            self.passes_requested,
            self.seed,
            if self.cancelled { " (cancelled)" } else { "" }
        ));
        lines.join("\n") + "\n"
    }
}
