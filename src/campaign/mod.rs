pub mod aggregate;
pub mod cancel;
pub mod engine;
pub mod pool;

pub use aggregate::{AggregateCounts, StageCounts, StageProbabilities};
pub use cancel::CancelToken;
pub use engine::{
    run_campaign, run_campaign_parallel, run_campaign_with_progress, CampaignOutcome,
    CampaignProgress,
};
pub use pool::WorkerPool;
