//! Config for the arena behaviors
//!
//! This module provides configuration options for controlling a beauty
//! contest session: round count, target rule, point scale, starter policy,
//! sampling temperature, and replayable randomness.
//!
//! Configuration can be created programmatically using [`ArenaConfig::new()`] or by reading
//! environment variables using [`ArenaConfig::from_env()`].
//!
//! # Environment Variables
//!
//! The following environment variables can be used to override configuration values. All
//! values are optional, and case-insensitive for flags. Set a flag to `"true"` to enable it.
//!
//! - `ARENA_LOG` — Enable logging to a file (default: `false`)
//! - `ARENA_ROUNDS` — Number of rounds per session (default: `10`)
//! - `ARENA_TARGET_MULTIPLIER` — Fraction of the mean used as target (default: `0.7`)
//! - `ARENA_TEMPERATURE` — Sampling temperature for every persona (default: `0.7`)
//! - `ARENA_RANDOMIZE_STARTER` — Draw the starter uniformly each round (default: `false`)
//! - `ARENA_STARTER` — Manual starter persona name (default: `Vanilla`)
//! - `ARENA_SEED` — Seed for the starter draw, for deterministic replay (default: unset)

use crate::agent::Persona;

/// How the first player of each round is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarterPolicy {
    /// Uniform independent draw among the roster, each round.
    Random,
    /// The designated persona starts every round; the rest follow in the
    /// declared roster order.
    Manual(Persona),
}

/// Configuration for a beauty contest session.
#[derive(Debug, Clone, Copy)]
pub struct ArenaConfig {
    pub(crate) log: bool,
    pub(crate) rounds: u32,
    pub(crate) target_multiplier: f64,
    pub(crate) points_per_round: f64,
    pub(crate) guess_min: f64,
    pub(crate) guess_max: f64,
    pub(crate) temperature: f32,
    pub(crate) starter_policy: StarterPolicy,
    pub(crate) seed: Option<u64>,
}

impl ArenaConfig {
    /// Create a new configuration with default parameters.
    ///
    /// By default:
    /// - Logging to file is disabled.
    /// - A session lasts 10 rounds.
    /// - The target is 0.7 times the mean of the guesses.
    /// - A perfect guess earns 100 points; score decreases linearly with distance.
    /// - Guesses are clamped into `0..=100`.
    /// - Every persona samples at temperature 0.7.
    /// - Vanilla starts every round.
    /// - The starter draw uses an OS-entropy seed.
    pub fn new() -> Self {
        Self {
            log: false,
            rounds: 10,
            target_multiplier: 0.7,
            points_per_round: 100.0,
            guess_min: 0.0,
            guess_max: 100.0,
            temperature: 0.7,
            starter_policy: StarterPolicy::Manual(Persona::Vanilla),
            seed: None,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// See the module documentation for the recognized variables. Any other
    /// value (including unset) will result in using the default value for
    /// each field.
    pub fn from_env() -> Self {
        fn get_env_flag(var: &str, default: bool) -> bool {
            match std::env::var(var) {
                Ok(val) => val.eq_ignore_ascii_case("true"),
                Err(_) => default,
            }
        }

        fn get_env_parsed<T: std::str::FromStr>(var: &str, default: T) -> T {
            match std::env::var(var) {
                Ok(val) => val.parse().unwrap_or(default),
                Err(_) => default,
            }
        }

        let starter = match std::env::var("ARENA_STARTER").as_deref() {
            Ok("Strategic") => Persona::Strategic,
            Ok("Aggressor") => Persona::Aggressor,
            _ => Persona::Vanilla,
        };

        let policy = if get_env_flag("ARENA_RANDOMIZE_STARTER", false) {
            StarterPolicy::Random
        } else {
            StarterPolicy::Manual(starter)
        };

        Self {
            log: get_env_flag("ARENA_LOG", false),
            rounds: get_env_parsed("ARENA_ROUNDS", 10),
            target_multiplier: get_env_parsed("ARENA_TARGET_MULTIPLIER", 0.7),
            points_per_round: 100.0,
            guess_min: 0.0,
            guess_max: 100.0,
            temperature: get_env_parsed("ARENA_TEMPERATURE", 0.7),
            starter_policy: policy,
            seed: std::env::var("ARENA_SEED").ok().and_then(|s| s.parse().ok()),
        }
    }

    /// Enable or disable logging to file.
    pub fn with_log(mut self, value: bool) -> Self {
        self.log = value;
        self
    }

    /// Set the number of rounds in a session.
    pub fn with_rounds(mut self, value: u32) -> Self {
        self.rounds = value;
        self
    }

    /// Set the fraction of the mean guess used as the round target.
    pub fn with_target_multiplier(mut self, value: f64) -> Self {
        self.target_multiplier = value;
        self
    }

    /// Set the points awarded for a perfect guess.
    pub fn with_points_per_round(mut self, value: f64) -> Self {
        self.points_per_round = value;
        self
    }

    /// Set the inclusive bounds guesses are clamped into.
    pub fn with_guess_bounds(mut self, min: f64, max: f64) -> Self {
        self.guess_min = min;
        self.guess_max = max;
        self
    }

    /// Set the sampling temperature applied to every persona.
    pub fn with_temperature(mut self, value: f32) -> Self {
        self.temperature = value;
        self
    }

    /// Set the starter policy.
    pub fn with_starter_policy(mut self, value: StarterPolicy) -> Self {
        self.starter_policy = value;
        self
    }

    /// Seed the starter draw for deterministic replay.
    pub fn with_seed(mut self, value: u64) -> Self {
        self.seed = Some(value);
        self
    }

    /// Number of rounds in a session.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Fraction of the mean guess used as the round target.
    pub fn target_multiplier(&self) -> f64 {
        self.target_multiplier
    }

    /// Starter policy in effect.
    pub fn starter_policy(&self) -> StarterPolicy {
        self.starter_policy
    }

    /// Sampling temperature applied to every persona.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod configuration_tests {
    use super::*;

    #[test]
    fn defaults_match_reference_game() {
        let config = ArenaConfig::new();
        assert_eq!(config.rounds, 10);
        assert_eq!(config.target_multiplier, 0.7);
        assert_eq!(config.starter_policy, StarterPolicy::Manual(Persona::Vanilla));
        assert!(config.seed.is_none());
    }

    #[test]
    fn builder_chains() {
        let config = ArenaConfig::new()
            .with_rounds(3)
            .with_target_multiplier(2.0 / 3.0)
            .with_starter_policy(StarterPolicy::Random)
            .with_seed(42);
        assert_eq!(config.rounds, 3);
        assert_eq!(config.target_multiplier, 2.0 / 3.0);
        assert_eq!(config.starter_policy, StarterPolicy::Random);
        assert_eq!(config.seed, Some(42));
    }
}
