use rand::Rng;
use rand_distr::{Distribution, Poisson};
use serde::Serialize;

use crate::data::{TeamId, VenueProfile};
use crate::error::{Result, SimError};
use crate::model::{Contender, MatchModel, Toss};

/// Scorecard of one simulated match. Scores never tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub first: TeamId,
    pub second: TeamId,
    pub winner: TeamId,
    pub first_score: u32,
    pub second_score: u32,
    pub toss: Toss,
}

impl MatchResult {
    pub fn loser(&self) -> TeamId {
        if self.winner == self.first {
            self.second
        } else {
            self.first
        }
    }

    /// Own score minus opponent score, from `team`'s point of view.
    pub fn margin_for(&self, team: TeamId) -> i64 {
        let margin = i64::from(self.first_score) - i64::from(self.second_score);
        if team == self.first {
            margin
        } else {
            -margin
        }
    }
}

impl MatchModel {
    /// Expected runs for each side before the toss bonus.
    pub fn expected_runs(
        &self,
        a: Contender<'_>,
        b: Contender<'_>,
        venue: Option<&VenueProfile>,
    ) -> (f64, f64) {
        let params = &self.params;
        let mut lambda_a = a.team.avg_runs_scored * (b.team.avg_runs_conceded / params.league_baseline);
        let mut lambda_b = b.team.avg_runs_scored * (a.team.avg_runs_conceded / params.league_baseline);

        if let Some(venue) = venue {
            let strength_a = a.team.condition_strength(venue.favours);
            let strength_b = b.team.condition_strength(venue.favours);
            let (up, down) = (1.0 + params.condition_edge, 1.0 - params.condition_edge);
            if strength_a > strength_b {
                lambda_a *= up;
                lambda_b *= down;
            } else if strength_b > strength_a {
                lambda_a *= down;
                lambda_b *= up;
            }
        }
        (lambda_a, lambda_b)
    }

    /// Play one match: toss, Poisson innings, clamp, then a weighted extra-over on a tie.
    pub fn simulate_match<R: Rng + ?Sized>(
        &self,
        a: Contender<'_>,
        b: Contender<'_>,
        venue: Option<&VenueProfile>,
        rng: &mut R,
    ) -> Result<MatchResult> {
        let params = &self.params;
        let toss = if rng.gen_bool(0.5) {
            Toss::First
        } else {
            Toss::Second
        };

        let (mut lambda_a, mut lambda_b) = self.expected_runs(a, b, venue);
        let batting_first_bonus = f64::from(rng.gen_range(params.toss_bonus_min..=params.toss_bonus_max));
        match toss {
            Toss::First => lambda_a += batting_first_bonus,
            Toss::Second => lambda_b += batting_first_bonus,
        }

        let mut score_a = self.clamp_score(sample_runs(lambda_a, rng)?);
        let mut score_b = self.clamp_score(sample_runs(lambda_b, rng)?);

        if score_a == score_b {
            let first_favoured = rng.gen::<f64>() < self.win_probability(a, b, venue, Some(toss));
            let (favoured, other) = if first_favoured {
                (&mut score_a, &mut score_b)
            } else {
                (&mut score_b, &mut score_a)
            };
            // At the ceiling the extra run is taken from the other side instead.
            if *favoured < params.max_score {
                *favoured += 1;
            } else {
                *other -= 1;
            }
        }

        Ok(MatchResult {
            first: a.id,
            second: b.id,
            winner: if score_a > score_b { a.id } else { b.id },
            first_score: score_a,
            second_score: score_b,
            toss,
        })
    }

    fn clamp_score(&self, raw: f64) -> u32 {
        raw.clamp(f64::from(self.params.min_score), f64::from(self.params.max_score)) as u32
    }
}

fn sample_runs<R: Rng + ?Sized>(lambda: f64, rng: &mut R) -> Result<f64> {
    let poisson = Poisson::new(lambda).map_err(|err| SimError::Sampling {
        lambda,
        message: err.to_string(),
    })?;
    Ok(poisson.sample(rng))
}
