mod common;

use std::collections::HashSet;
use std::sync::Arc;

use bracket_odds::config::{FormatParams, SecondaryDraw, SimulationConfig};
use bracket_odds::data::{TeamId, TeamRegistry};
use bracket_odds::model::{MatchModel, SeedStream};
use bracket_odds::tournament::{play_round_robin, run_secondary_stage, TournamentSimulator};
use bracket_odds::SimError;

use common::{catalog, registry};

fn builtin() -> Arc<TeamRegistry> {
    TeamRegistry::builtin().expect("builtin catalog should load")
}

#[test]
fn five_team_round_robin_plays_every_pair_once() {
    let registry = builtin();
    let group = &registry.groups()[0];
    let model = MatchModel::default();
    let format = FormatParams::default();
    let mut rng = SeedStream::new(17).rng_for(0);

    let table = play_round_robin(
        &registry,
        &model,
        &format,
        &group.members,
        registry.group_venue(group),
        &mut rng,
    )
    .unwrap();

    assert_eq!(table.matches.len(), 10);
    assert_eq!(table.total_points(), 20);
    assert!(table.standings.iter().all(|s| s.played == 4));

    let pairs: HashSet<(TeamId, TeamId)> = table
        .matches
        .iter()
        .map(|m| (m.first.min(m.second), m.first.max(m.second)))
        .collect();
    assert_eq!(pairs.len(), 10);

    let differential_sum: f64 = table.standings.iter().map(|s| s.differential).sum();
    assert!(differential_sum.abs() < 1e-9);
}

#[test]
fn standings_are_sorted_by_points_then_differential() {
    let registry = builtin();
    let model = MatchModel::default();
    let format = FormatParams::default();
    for pass in 0..50 {
        let mut rng = SeedStream::new(3).rng_for(pass);
        for group in registry.groups() {
            let table = play_round_robin(&registry, &model, &format, &group.members, None, &mut rng)
                .unwrap();
            for pair in table.standings.windows(2) {
                let (upper, lower) = (&pair[0], &pair[1]);
                assert!(
                    upper.points > lower.points
                        || (upper.points == lower.points && upper.differential >= lower.differential),
                    "{upper:?} ranked above {lower:?}"
                );
            }
        }
    }
}

#[test]
fn secondary_stage_sends_four_distinct_qualifiers_through() {
    let registry = builtin();
    let model = MatchModel::default();
    let qualifiers: Vec<TeamId> = registry.groups().iter().flat_map(|g| g.members[..2].to_vec()).collect();
    assert_eq!(qualifiers.len(), 8);

    for draw in [SecondaryDraw::Random, SecondaryDraw::Seeded] {
        let format = FormatParams {
            secondary_draw: draw,
            ..FormatParams::default()
        };
        for pass in 0..25 {
            let mut rng = SeedStream::new(41).rng_for(pass);
            let outcome = run_secondary_stage(&registry, &model, &format, &qualifiers, &mut rng).unwrap();
            let unique: HashSet<TeamId> = outcome.survivors.iter().copied().collect();
            assert_eq!(outcome.survivors.len(), 4);
            assert_eq!(unique.len(), 4);
            assert!(outcome.survivors.iter().all(|team| qualifiers.contains(team)));
            assert_eq!(outcome.pools[0].matches.len(), 6);
            assert_eq!(outcome.pools[1].matches.len(), 6);
        }
    }
}

#[test]
fn full_pass_links_every_stage() {
    let registry = builtin();
    let simulator = TournamentSimulator::new(registry.clone(), &SimulationConfig::default()).unwrap();
    let mut rng = SeedStream::new(2026).rng_for(0);
    let pass = simulator.run_pass(&mut rng).unwrap();

    assert_eq!(pass.groups.len(), 4);
    assert_eq!(pass.qualifiers.len(), 8);
    for group in &pass.groups {
        assert!(pass.qualifiers.contains(&group.winner()));
        assert!(pass.qualifiers.contains(&group.runner_up()));
    }
    assert!(pass.survivors().iter().all(|team| pass.qualifiers.contains(team)));
    assert!(pass.finalists().iter().all(|team| pass.survivors().contains(team)));
    assert!(pass.finalists().contains(&pass.champion()));

    let named = pass.named(&registry);
    let json = serde_json::to_value(&named).unwrap();
    assert!(json["champion"].is_string());
}

#[test]
fn simulator_accepts_other_even_brackets() {
    let registry = registry(catalog(2, 4));
    let simulator = TournamentSimulator::new(registry, &SimulationConfig::default()).unwrap();
    let mut rng = SeedStream::new(8).rng_for(0);
    let pass = simulator.run_pass(&mut rng).unwrap();
    assert_eq!(pass.qualifiers.len(), 4);
    assert_eq!(pass.survivors().len(), 4);
}

#[test]
fn simulator_rejects_brackets_that_cannot_fill_the_secondary_stage() {
    let mut config = SimulationConfig::default();
    config.format.qualifiers_per_group = 1;
    // Two groups sending one team each leaves pools of one.
    let err = TournamentSimulator::new(registry(catalog(2, 3)), &config).unwrap_err();
    assert!(matches!(err, SimError::InvalidConfig(_)));

    // Three single qualifiers cannot be split into equal pools.
    let err = TournamentSimulator::new(registry(catalog(3, 3)), &config).unwrap_err();
    assert!(matches!(err, SimError::InvalidConfig(_)));
}

#[test]
fn simulator_rejects_invalid_parameters_before_any_pass() {
    let cases: [(&str, fn(&mut SimulationConfig)); 5] = [
        ("inverted toss bonus", |c| {
            c.model.toss_bonus_min = 9;
            c.model.toss_bonus_max = 5;
        }),
        ("inverted score range", |c| {
            c.model.min_score = 260;
            c.model.max_score = 120;
        }),
        ("inverted probability clamp", |c| {
            c.model.probability_floor = 0.9;
            c.model.probability_ceiling = 0.2;
        }),
        ("three survivors per pool", |c| c.format.survivors_per_pool = 3),
        ("one survivor per pool", |c| c.format.survivors_per_pool = 1),
    ];

    for (label, corrupt) in cases {
        let mut config = SimulationConfig::default();
        corrupt(&mut config);
        match TournamentSimulator::new(builtin(), &config) {
            Err(SimError::InvalidConfig(_)) => {}
            Err(other) => panic!("{label}: expected InvalidConfig, got {other}"),
            Ok(_) => panic!("{label}: invalid config was accepted"),
        }
    }
}
