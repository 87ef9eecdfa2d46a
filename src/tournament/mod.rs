pub mod group;
pub mod knockout;
pub mod pass;
pub mod secondary;
pub mod standings;

pub use group::{qualifiers, run_group_stage, GroupOutcome};
pub use knockout::{run_knockout, KnockoutOutcome};
pub use pass::{NamedPass, PassResult, TournamentSimulator};
pub use secondary::{draw_pools, run_secondary_stage, SecondaryOutcome};
pub use standings::{play_round_robin, rank_standings, RoundRobin, StageStanding};
