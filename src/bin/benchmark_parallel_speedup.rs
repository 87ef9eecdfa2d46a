//! Run one campaign sequentially and once on rayon workers, then print timings and speedup.
//!
//! Usage: cargo run --release --bin benchmark_parallel_speedup [passes]

use std::env;
use std::process;
use std::time::Instant;

use bracket_odds::campaign::{run_campaign, run_campaign_parallel};
use bracket_odds::config::SimulationConfig;
use bracket_odds::data::TeamRegistry;
use bracket_odds::tournament::TournamentSimulator;

fn main() {
    let passes = env::args()
        .nth(1)
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or(5_000);

    let mut config = SimulationConfig::default();
    config.campaign.passes = passes;
    config.campaign.seed = Some(12345);

    let simulator = match TeamRegistry::builtin()
        .and_then(|registry| TournamentSimulator::new(registry, &config))
    {
        Ok(simulator) => simulator,
        Err(err) => {
            eprintln!("setup failed: {err}");
            process::exit(1);
        }
    };
    println!(
        "Campaign: {} passes over {} teams",
        passes,
        simulator.registry().len()
    );
    println!();

    let t0 = Instant::now();
    let sequential = run_campaign(&simulator, &config.campaign);
    let elapsed_seq = t0.elapsed();

    let t0 = Instant::now();
    let parallel = run_campaign_parallel(&simulator, &config.campaign);
    let elapsed_par = t0.elapsed();

    let (sequential, parallel) = match (sequential, parallel) {
        (Ok(sequential), Ok(parallel)) => (sequential, parallel),
        (Err(err), _) | (_, Err(err)) => {
            eprintln!("campaign failed: {err}");
            process::exit(1);
        }
    };

    let seq_ms = elapsed_seq.as_secs_f64() * 1000.0;
    let par_ms = elapsed_par.as_secs_f64() * 1000.0;
    println!(
        "Sequential:  {:.2} ms  ({:.1} passes/s)",
        seq_ms,
        passes as f64 / elapsed_seq.as_secs_f64()
    );
    println!(
        "Parallel:    {:.2} ms  ({:.1} passes/s)",
        par_ms,
        passes as f64 / elapsed_par.as_secs_f64()
    );
    println!();
    println!("Speedup:     {:.2}x (parallel vs sequential)", seq_ms / par_ms);

    assert_eq!(sequential.counts, parallel.counts, "tallies diverged between runs");
    println!("(Tallies match sequential vs parallel)");
}
