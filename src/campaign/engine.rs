use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::campaign::aggregate::AggregateCounts;
use crate::campaign::cancel::CancelToken;
use crate::campaign::pool::WorkerPool;
use crate::config::CampaignParams;
use crate::error::Result;
use crate::model::{random_master_seed, SeedStream};
use crate::tournament::TournamentSimulator;

/// Progress notification, delivered after every chunk of `progress_every` passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CampaignProgress {
    pub completed: u64,
    pub requested: u64,
}

impl CampaignProgress {
    pub fn fraction(&self) -> f64 {
        if self.requested == 0 {
            1.0
        } else {
            self.completed as f64 / self.requested as f64
        }
    }
}

#[derive(Debug, Clone)]
pub struct CampaignOutcome {
    pub counts: AggregateCounts,
    pub requested: u64,
    pub seed: u64,
    pub cancelled: bool,
}

impl CampaignOutcome {
    pub fn completed(&self) -> u64 {
        self.counts.passes()
    }
}

/// Run every pass on the calling thread.
pub fn run_campaign(
    simulator: &TournamentSimulator,
    params: &CampaignParams,
) -> Result<CampaignOutcome> {
    run_campaign_with_parallelism(simulator, params, false, None, |_| {})
}

/// Like [run_campaign] but spreads passes over rayon workers. Same seed, same counts.
pub fn run_campaign_parallel(
    simulator: &TournamentSimulator,
    params: &CampaignParams,
) -> Result<CampaignOutcome> {
    run_campaign_with_parallelism(simulator, params, true, None, |_| {})
}

/// Parallel campaign that reports progress and stops early once `cancel` is set.
/// A cancelled campaign keeps the counts of the passes it finished.
pub fn run_campaign_with_progress<F>(
    simulator: &TournamentSimulator,
    params: &CampaignParams,
    parallel: bool,
    cancel: &CancelToken,
    on_progress: F,
) -> Result<CampaignOutcome>
where
    F: FnMut(CampaignProgress) + Send,
{
    run_campaign_with_parallelism(simulator, params, parallel, Some(cancel), on_progress)
}

fn run_campaign_with_parallelism<F>(
    simulator: &TournamentSimulator,
    params: &CampaignParams,
    parallel: bool,
    cancel: Option<&CancelToken>,
    mut on_progress: F,
) -> Result<CampaignOutcome>
where
    F: FnMut(CampaignProgress) + Send,
{
    let seed = params.seed.unwrap_or_else(random_master_seed);
    let seeds = SeedStream::new(seed);
    let requested = params.passes as u64;
    let chunk_size = params.progress_every.max(1) as u64;
    let team_count = simulator.registry().len();
    let is_cancelled = || cancel.is_some_and(CancelToken::is_cancelled);

    info!(passes = requested, seed, parallel, workers = params.workers, "campaign started");

    let tally_pass = |mut tally: AggregateCounts, pass: u64| -> Result<AggregateCounts> {
        if is_cancelled() {
            return Ok(tally);
        }
        let mut rng = seeds.rng_for(pass);
        let result = simulator.run_pass(&mut rng)?;
        tally.record(&result);
        Ok(tally)
    };

    let pool = WorkerPool::with_workers(if parallel { params.workers } else { 0 });
    let counts = pool.install(|| -> Result<AggregateCounts> {
        let mut counts = AggregateCounts::zeroed(team_count);
        let mut start = 0u64;
        while start < requested && !is_cancelled() {
            let end = (start + chunk_size).min(requested);
            let chunk = if parallel {
                (start..end)
                    .into_par_iter()
                    .try_fold(|| AggregateCounts::zeroed(team_count), tally_pass)
                    .try_reduce(
                        || AggregateCounts::zeroed(team_count),
                        |left, right| Ok(left.merged(right)),
                    )?
            } else {
                (start..end).try_fold(AggregateCounts::zeroed(team_count), tally_pass)?
            };
            counts = counts.merged(chunk);
            start = end;

            debug!(completed = counts.passes(), requested, "campaign chunk finished");
            on_progress(CampaignProgress {
                completed: counts.passes(),
                requested,
            });
        }
        Ok(counts)
    })??;

    let cancelled = counts.passes() < requested;
    if cancelled {
        warn!(completed = counts.passes(), requested, "campaign cancelled early");
    } else {
        info!(completed = counts.passes(), "campaign finished");
    }

    Ok(CampaignOutcome {
        counts,
        requested,
        seed,
        cancelled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::data::TeamRegistry;

    fn simulator() -> TournamentSimulator {
        TournamentSimulator::new(TeamRegistry::builtin().unwrap(), &SimulationConfig::default()).unwrap()
    }

    fn params(passes: usize, seed: u64) -> CampaignParams {
        CampaignParams {
            passes,
            seed: Some(seed),
            workers: 0,
            progress_every: 50,
        }
    }

    #[test]
    fn sequential_and_parallel_agree() {
        let sim = simulator();
        let sequential = run_campaign(&sim, &params(200, 11)).unwrap();
        let parallel = run_campaign_parallel(&sim, &params(200, 11)).unwrap();
        assert_eq!(sequential.counts, parallel.counts);
        assert_eq!(sequential.completed(), 200);
        assert!(!parallel.cancelled);
    }

    #[test]
    fn progress_fires_per_chunk_and_ends_at_total() {
        let sim = simulator();
        let mut seen = Vec::new();
        let outcome = run_campaign_with_progress(&sim, &params(120, 3), false, &CancelToken::new(), |p| {
            seen.push(p.completed)
        })
        .unwrap();
        assert_eq!(seen, vec![50, 100, 120]);
        assert_eq!(outcome.completed(), 120);
    }

    #[test]
    fn cancel_from_progress_keeps_completed_passes() {
        let sim = simulator();
        let cancel = CancelToken::new();
        let trigger = cancel.clone();
        let outcome = run_campaign_with_progress(&sim, &params(500, 8), true, &cancel, |p| {
            if p.completed >= 100 {
                trigger.cancel();
            }
        })
        .unwrap();
        assert!(outcome.cancelled);
        assert_eq!(outcome.completed(), 100);
        assert_eq!(outcome.requested, 500);
    }

    #[test]
    fn cancelled_before_start_runs_nothing() {
        let sim = simulator();
        let cancel = CancelToken::new();
        cancel.cancel();
        let outcome = run_campaign_with_progress(&sim, &params(100, 1), true, &cancel, |_| {}).unwrap();
        assert_eq!(outcome.completed(), 0);
        assert!(outcome.cancelled);
    }
}
