//! Pure scoring rules for a beauty contest round.

use std::collections::HashMap;

use crate::agent::Persona;
use crate::configuration::ArenaConfig;
use crate::error::ArenaError;

/// Target and per-agent scores for one round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    pub target: f64,
    pub scores: HashMap<Persona, f64>,
}

/// Computes the round target from submitted guesses and assigns each agent
/// a distance-based score. No side effects, no external calls: any failure
/// here is a programming or input error, never a transient one.
#[derive(Debug, Clone, Copy)]
pub struct Referee {
    target_multiplier: f64,
    points_per_round: f64,
}

impl Referee {
    pub fn new(config: &ArenaConfig) -> Self {
        Referee {
            target_multiplier: config.target_multiplier,
            points_per_round: config.points_per_round,
        }
    }

    /// Score a complete guess set.
    ///
    /// The target is `multiplier x mean(guesses)`. Each agent earns
    /// `max(0, points - |guess - target|)`, so closer guesses score higher
    /// and equal distances always earn equal scores.
    ///
    /// # Errors
    /// [`ArenaError::InvalidInput`] if `guesses` does not contain exactly
    /// the roster personas, or if any value is NaN or infinite.
    pub fn compute_round(
        &self,
        roster: &[Persona],
        guesses: &HashMap<Persona, f64>,
    ) -> Result<RoundOutcome, ArenaError> {
        for persona in roster {
            match guesses.get(persona) {
                None => {
                    return Err(ArenaError::InvalidInput(format!(
                        "no guess submitted for {persona}"
                    )))
                }
                Some(value) if !value.is_finite() => {
                    return Err(ArenaError::InvalidInput(format!(
                        "non-finite guess {value} from {persona}"
                    )))
                }
                Some(_) => {}
            }
        }
        if guesses.len() != roster.len() {
            return Err(ArenaError::InvalidInput(format!(
                "expected {} guesses, got {}",
                roster.len(),
                guesses.len()
            )));
        }

        let mean = guesses.values().sum::<f64>() / guesses.len() as f64;
        let target = self.target_multiplier * mean;

        let scores = guesses
            .iter()
            .map(|(persona, guess)| {
                let distance = (guess - target).abs();
                (*persona, (self.points_per_round - distance).max(0.0))
            })
            .collect();

        Ok(RoundOutcome { target, scores })
    }
}

#[cfg(test)]
mod referee_tests {
    use super::*;

    fn referee() -> Referee {
        Referee::new(&ArenaConfig::new())
    }

    fn guesses(v: f64, s: f64, a: f64) -> HashMap<Persona, f64> {
        HashMap::from([
            (Persona::Vanilla, v),
            (Persona::Strategic, s),
            (Persona::Aggressor, a),
        ])
    }

    #[test]
    fn target_is_multiplier_times_mean() {
        let referee = Referee::new(&ArenaConfig::new().with_target_multiplier(2.0 / 3.0));
        let outcome = referee
            .compute_round(&Persona::ALL, &guesses(50.0, 30.0, 10.0))
            .unwrap();
        assert!((outcome.target - 20.0).abs() < 1e-9);
    }

    #[test]
    fn closer_guess_scores_higher() {
        let outcome = referee()
            .compute_round(&Persona::ALL, &guesses(50.0, 30.0, 40.0))
            .unwrap();
        // target = 0.7 * 40 = 28; Strategic is closest, Vanilla farthest
        let v = outcome.scores[&Persona::Vanilla];
        let s = outcome.scores[&Persona::Strategic];
        let a = outcome.scores[&Persona::Aggressor];
        assert!(s > a && a > v);
    }

    #[test]
    fn equal_distance_earns_equal_score() {
        let referee = Referee::new(&ArenaConfig::new().with_target_multiplier(2.0 / 3.0));
        // mean = 30, target = 20, Strategic and Aggressor both at distance 10
        let outcome = referee
            .compute_round(&Persona::ALL, &guesses(50.0, 30.0, 10.0))
            .unwrap();
        let s = outcome.scores[&Persona::Strategic];
        let a = outcome.scores[&Persona::Aggressor];
        assert_eq!(s, a);
        assert!(outcome.scores[&Persona::Vanilla] < s);
    }

    #[test]
    fn score_floors_at_zero() {
        let referee = Referee::new(&ArenaConfig::new().with_points_per_round(10.0));
        let outcome = referee
            .compute_round(&Persona::ALL, &guesses(100.0, 0.0, 0.0))
            .unwrap();
        // target = 0.7 * 33.33 = 23.33; Vanilla is ~76.67 away, well past the floor
        assert_eq!(outcome.scores[&Persona::Vanilla], 0.0);
    }

    #[test]
    fn missing_agent_is_rejected() {
        let mut partial = guesses(50.0, 30.0, 10.0);
        partial.remove(&Persona::Aggressor);
        let err = referee()
            .compute_round(&Persona::ALL, &partial)
            .unwrap_err();
        assert!(matches!(err, ArenaError::InvalidInput(_)));
    }

    #[test]
    fn non_finite_guess_is_rejected() {
        let err = referee()
            .compute_round(&Persona::ALL, &guesses(f64::NAN, 30.0, 10.0))
            .unwrap_err();
        assert!(matches!(err, ArenaError::InvalidInput(_)));

        let err = referee()
            .compute_round(&Persona::ALL, &guesses(f64::INFINITY, 30.0, 10.0))
            .unwrap_err();
        assert!(matches!(err, ArenaError::InvalidInput(_)));
    }

    #[test]
    fn stranger_in_guess_set_is_rejected() {
        let roster = [Persona::Vanilla, Persona::Strategic];
        let err = referee()
            .compute_round(&roster, &guesses(50.0, 30.0, 10.0))
            .unwrap_err();
        assert!(matches!(err, ArenaError::InvalidInput(_)));
    }
}
