//! Win probability for the first side of a fixture.
//!
//! p = 0.35·rating + 0.25·form + 0.25·ranking + 0.15·player (reference weights), then the
//! affinity boost and toss factor are applied multiplicatively and the result is clamped
//! to [0.01, 0.99].

use serde::Serialize;

use crate::config::TermWeights;
use crate::data::VenueProfile;
use crate::model::{Contender, MatchModel};

/// Which side of the fixture won the toss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Toss {
    First,
    Second,
}

/// The four unweighted terms, each centred on 0.5 for evenly matched sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProbabilityTerms {
    pub rating: f64,
    pub form: f64,
    pub ranking: f64,
    pub player_strength: f64,
}

impl ProbabilityTerms {
    pub fn weighted(&self, weights: &TermWeights) -> f64 {
        weights.rating * self.rating
            + weights.form * self.form
            + weights.ranking * self.ranking
            + weights.player_strength * self.player_strength
    }
}

impl MatchModel {
    pub fn probability_terms(&self, a: Contender<'_>, b: Contender<'_>) -> ProbabilityTerms {
        let (a, b) = (a.team, b.team);
        let rating_gap = a.rating - b.rating;
        ProbabilityTerms {
            rating: 1.0 / (1.0 + 10f64.powf(-rating_gap / self.params.rating_divisor)),
            form: 0.5 + (a.recent_win_rate - b.recent_win_rate) / 2.0,
            ranking: 0.5 + self.params.ranking_step * (f64::from(b.ranking) - f64::from(a.ranking)),
            player_strength: 0.5 + (a.player_strength - b.player_strength) / 2.0,
        }
    }

    /// Probability that `a` beats `b`. `venue` of None is neutral ground.
    pub fn win_probability(
        &self,
        a: Contender<'_>,
        b: Contender<'_>,
        venue: Option<&VenueProfile>,
        toss: Option<Toss>,
    ) -> f64 {
        let params = &self.params;
        let mut probability = self.probability_terms(a, b).weighted(&params.weights);

        if venue.is_some_and(|venue| venue.has_affinity(a.id)) {
            probability *= params.affinity_boost;
        }
        match toss {
            Some(Toss::First) => probability *= params.toss_factor,
            Some(Toss::Second) => probability /= params.toss_factor,
            None => {}
        }

        assert!(
            probability.is_finite(),
            "non-finite win probability for '{}' vs '{}'",
            a.team.name,
            b.team.name
        );
        probability.clamp(params.probability_floor, params.probability_ceiling)
    }
}
