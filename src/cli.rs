use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::campaign::{run_campaign_with_progress, CancelToken, CampaignProgress};
use crate::config::SimulationConfig;
use crate::data::{load_catalog, reference_catalog, validate_catalog, TeamRegistry};
use crate::error::{Result, SimError};
use crate::model::{Contender, SeedStream};
use crate::report::CampaignReport;
use crate::tournament::TournamentSimulator;

const USAGE: &str = "usage: bracket_odds <simulate|pass|match|validate>";
const MATCH_USAGE: &str = "usage: bracket_odds match <team> <team> [venue] [count] [seed]";

const VALUE_FLAGS: [&str; 6] = [
    "--catalog",
    "--config",
    "--workers",
    "--out",
    "--csv",
    "--time-limit",
];
const SWITCHES: [&str; 2] = ["--table", "--sequential"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Simulate,
    Pass,
    Match,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("simulate") => Some(Command::Simulate),
        Some("pass") => Some(Command::Pass),
        Some("match") => Some(Command::Match),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let Some(command) = parse_command(args) else {
        eprintln!("{USAGE}");
        return 2;
    };
    let invocation = match Invocation::split(args) {
        Ok(invocation) => invocation,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("{USAGE}");
            return 2;
        }
    };

    match command {
        Command::Simulate => handle_simulate(&invocation),
        Command::Pass => handle_pass(&invocation),
        Command::Match => handle_match(&invocation),
        Command::Validate => handle_validate(&invocation),
    }
}

/// Arguments after the subcommand, split into positionals, `--flag value` pairs and switches.
#[derive(Debug, Default)]
struct Invocation<'a> {
    positional: Vec<&'a str>,
    options: Vec<(&'a str, &'a str)>,
    switches: Vec<&'a str>,
}

impl<'a> Invocation<'a> {
    fn split(args: &'a [String]) -> std::result::Result<Self, String> {
        let mut invocation = Invocation::default();
        let mut rest = args.iter().skip(2).map(String::as_str);
        while let Some(arg) = rest.next() {
            if VALUE_FLAGS.contains(&arg) {
                let value = rest.next().ok_or_else(|| format!("missing value for {arg}"))?;
                invocation.options.push((arg, value));
            } else if SWITCHES.contains(&arg) {
                invocation.switches.push(arg);
            } else if arg.starts_with("--") {
                return Err(format!("unknown option '{arg}'"));
            } else {
                invocation.positional.push(arg);
            }
        }
        Ok(invocation)
    }

    fn positional(&self, index: usize) -> Option<&'a str> {
        self.positional.get(index).copied()
    }

    fn option(&self, flag: &str) -> Option<&'a str> {
        self.options
            .iter()
            .rev()
            .find(|(name, _)| *name == flag)
            .map(|(_, value)| *value)
    }

    fn switch(&self, flag: &str) -> bool {
        self.switches.contains(&flag)
    }
}

fn handle_simulate(invocation: &Invocation<'_>) -> i32 {
    match simulate(invocation) {
        Ok(output) => {
            println!("{output}");
            0
        }
        Err(err) => {
            eprintln!("simulation failed: {err}");
            1
        }
    }
}

fn simulate(invocation: &Invocation<'_>) -> Result<String> {
    let mut config = load_config(invocation.option("--config"))?;
    let campaign = &mut config.campaign;
    campaign.passes = parse_number_arg(invocation.positional(0), "passes", campaign.passes);
    campaign.seed = invocation
        .positional(1)
        .map(|raw| parse_number_arg(Some(raw), "seed", 0u64))
        .or(campaign.seed);
    campaign.workers = parse_number_arg(invocation.option("--workers"), "workers", campaign.workers);
    config.validate()?;

    let registry = load_registry(invocation.option("--catalog"))?;
    let simulator = TournamentSimulator::new(Arc::clone(&registry), &config)?;

    let cancel = CancelToken::new();
    if let Some(raw) = invocation.option("--time-limit") {
        let seconds = parse_number_arg(Some(raw), "time-limit", 0.0f64);
        if seconds.is_finite() && seconds > 0.0 {
            arm_time_limit(cancel.clone(), Duration::from_secs_f64(seconds));
        }
    }

    let parallel = !invocation.switch("--sequential");
    let outcome = run_campaign_with_progress(
        &simulator,
        &config.campaign,
        parallel,
        &cancel,
        |progress: CampaignProgress| {
            info!(
                completed = progress.completed,
                requested = progress.requested,
                "{:.0}% of passes done",
                progress.fraction() * 100.0
            );
        },
    )?;

    let report = CampaignReport::from_outcome(&outcome, &registry);
    if let Some(path) = invocation.option("--out") {
        report.write_json(path)?;
        info!(path, "report written");
    }
    if let Some(path) = invocation.option("--csv") {
        report.write_csv_file(path)?;
        info!(path, "csv written");
    }

    if invocation.switch("--table") {
        Ok(report.render_table())
    } else {
        report.to_json()
    }
}

fn arm_time_limit(cancel: CancelToken, limit: Duration) {
    info!(seconds = limit.as_secs_f64(), "campaign time limit armed");
    thread::spawn(move || {
        thread::sleep(limit);
        cancel.cancel();
    });
}

fn handle_pass(invocation: &Invocation<'_>) -> i32 {
    let seed = parse_number_arg(invocation.positional(0), "seed", 7u64);
    let outcome = (|| -> Result<String> {
        let config = load_config(invocation.option("--config"))?;
        let registry = load_registry(invocation.option("--catalog"))?;
        let simulator = TournamentSimulator::new(Arc::clone(&registry), &config)?;
        let mut rng = SeedStream::new(seed).rng_for(0);
        let pass = simulator.run_pass(&mut rng)?;
        serde_json::to_string_pretty(&pass.named(&registry))
            .map_err(|err| SimError::Export(err.to_string()))
    })();

    match outcome {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("pass failed: {err}");
            1
        }
    }
}

#[derive(Debug, Serialize)]
struct HeadToHead<'a> {
    team_a: &'a str,
    team_b: &'a str,
    venue: &'a str,
    matches: u32,
    seed: u64,
    wins_a: u32,
    win_rate_a: f64,
    mean_score_a: f64,
    mean_score_b: f64,
    analytic_win_probability_a: f64,
}

fn handle_match(invocation: &Invocation<'_>) -> i32 {
    let (Some(team_a), Some(team_b)) = (invocation.positional(0), invocation.positional(1)) else {
        eprintln!("{MATCH_USAGE}");
        return 2;
    };
    let venue = invocation.positional(2).unwrap_or("neutral");
    let count = parse_number_arg(invocation.positional(3), "count", 1_000u32);
    let seed = parse_number_arg(invocation.positional(4), "seed", 7u64);

    let outcome = (|| -> Result<String> {
        let config = load_config(invocation.option("--config"))?;
        let registry = load_registry(invocation.option("--catalog"))?;
        let simulator = TournamentSimulator::new(Arc::clone(&registry), &config)?;
        let model = simulator.model();

        let a = Contender::of(&registry, registry.id_of(team_a)?);
        let b = Contender::of(&registry, registry.id_of(team_b)?);
        let profile = registry.venue(venue)?;

        let mut rng = SeedStream::new(seed).rng_for(0);
        let (mut wins_a, mut runs_a, mut runs_b) = (0u32, 0u64, 0u64);
        for _ in 0..count {
            let result = model.simulate_match(a, b, profile, &mut rng)?;
            if result.winner == a.id {
                wins_a += 1;
            }
            runs_a += u64::from(result.first_score);
            runs_b += u64::from(result.second_score);
        }
        let per_match = |total: u64| if count == 0 { 0.0 } else { total as f64 / f64::from(count) };

        let summary = HeadToHead {
            team_a: &a.team.name,
            team_b: &b.team.name,
            venue,
            matches: count,
            seed,
            wins_a,
            win_rate_a: per_match(u64::from(wins_a)),
            mean_score_a: per_match(runs_a),
            mean_score_b: per_match(runs_b),
            analytic_win_probability_a: model.win_probability(a, b, profile, None),
        };
        serde_json::to_string_pretty(&summary).map_err(|err| SimError::Export(err.to_string()))
    })();

    match outcome {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("match failed: {err}");
            1
        }
    }
}

fn handle_validate(invocation: &Invocation<'_>) -> i32 {
    let path = invocation.positional(0);
    let label = path.unwrap_or("<builtin catalog>");
    let catalog = match path {
        Some(path) => load_catalog(path),
        None => reference_catalog(),
    };
    let catalog = match catalog {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("validation failed: {err}");
            return 1;
        }
    };

    let report = validate_catalog(&catalog);
    for warning in report.warnings() {
        println!("- {warning}");
    }
    if report.has_errors() {
        let errors: Vec<_> = report.errors().collect();
        eprintln!("validation failed: {} issue(s)", errors.len());
        for issue in errors {
            eprintln!("- {issue}");
        }
        return 1;
    }
    println!(
        "validation passed: {label} ({} teams, {} warning(s))",
        catalog.teams.len(),
        report.warnings().count()
    );
    0
}

fn load_config(path: Option<&str>) -> Result<SimulationConfig> {
    match path {
        Some(path) => SimulationConfig::load(path),
        None => SimulationConfig::from_env(),
    }
}

fn load_registry(path: Option<&str>) -> Result<Arc<TeamRegistry>> {
    match path {
        Some(path) => TeamRegistry::load(path),
        None => TeamRegistry::builtin(),
    }
}

fn parse_number_arg<T>(raw: Option<&str>, name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    raw.and_then(|value| value.parse::<T>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                eprintln!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}
