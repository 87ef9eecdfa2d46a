#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use bracket_odds::data::{CatalogFile, Competitor, Condition, ScheduleSpec, TeamRegistry, VenueSpec};

/// An evenly matched competitor; tests override the fields they care about.
pub fn competitor(name: &str, group: &str, ranking: u32) -> Competitor {
    Competitor {
        name: name.to_string(),
        group: group.to_string(),
        ranking,
        rating: 1100.0,
        avg_runs_scored: 160.0,
        avg_runs_conceded: 160.0,
        recent_win_rate: 0.5,
        player_strength: 0.7,
        spin_strength: 0.7,
        pace_strength: 0.7,
    }
}

/// `groups` groups of `size` teams named "<group><n>", all played at one spin venue "Home".
pub fn catalog(groups: usize, size: usize) -> CatalogFile {
    let mut teams = Vec::new();
    let mut schedule = BTreeMap::new();
    for g in 0..groups {
        let group = char::from(b'A' + g as u8).to_string();
        for n in 1..=size {
            let ranking = (g * size + n) as u32;
            teams.push(competitor(&format!("{group}{n}"), &group, ranking));
        }
        schedule.insert(group, "Home".to_string());
    }
    CatalogFile {
        teams,
        venues: vec![VenueSpec {
            name: "Home".to_string(),
            favours: Condition::Spin,
            affinity: vec!["A1".to_string()],
        }],
        schedule: ScheduleSpec {
            groups: schedule,
            secondary: Some("Home".to_string()),
            knockout: Some("Home".to_string()),
        },
    }
}

pub fn registry(catalog: CatalogFile) -> Arc<TeamRegistry> {
    Arc::new(TeamRegistry::from_catalog(catalog).expect("fixture catalog should validate"))
}
