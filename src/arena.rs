//! Session lifecycle and per-round sequencing.
//!
//! The [`Arena`] owns all session state: the three-persona roster, the
//! starter policy, the round counter, cumulative scores, and the history of
//! completed rounds. State only changes through [`Arena::run_turn`] (and
//! [`Arena::restart`]), and a failed round never commits partially.

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, info, instrument, trace, warn};

use crate::agent::{Agent, AgentIdentity, HistoryView, Persona};
use crate::configuration::{ArenaConfig, StarterPolicy};
use crate::error::ArenaError;
use crate::logger::init_logger;
use crate::move_logger::MoveLogger;
use crate::record::{MoveEntry, RoundRecord};
use crate::referee::Referee;

/// Where a session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No round has been initialized yet. Only observable through
    /// [`Arena::restart`]; constructors leave this state immediately.
    NotStarted,
    /// Round `k` (1-based) is the next one to run.
    InProgress(u32),
    /// The final round completed. Only a restart is valid from here.
    Completed,
}

/// UTC timestamp in RFC 3339, used for run dates and move rows.
pub(crate) fn utc_timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| String::from("unknown"))
}

/// The match orchestrator: sequences turns, collects guesses, delegates
/// scoring to the [`Referee`], and maintains cumulative scores.
pub struct Arena {
    agents: Vec<Box<dyn Agent>>,
    identities: Vec<AgentIdentity>,
    referee: Referee,
    move_logger: Box<dyn MoveLogger>,
    config: ArenaConfig,
    rng: ChaCha8Rng,
    phase: SessionPhase,
    history: Vec<RoundRecord>,
    cumulative: HashMap<Persona, f64>,
    /// Cumulative score after each completed round, per persona, starting
    /// at 0.0 before round 1. Consumed by chart-rendering collaborators.
    series: HashMap<Persona, Vec<f64>>,
    winners: Vec<Persona>,
    run_date: String,
}

impl Arena {
    /// Create a session and move straight to `InProgress(1)`.
    ///
    /// # Errors
    /// [`ArenaError::InvalidInput`] if `agents` is not exactly the three
    /// distinct roster personas.
    #[instrument(skip_all)]
    pub fn new(
        agents: Vec<Box<dyn Agent>>,
        move_logger: Box<dyn MoveLogger>,
        config: ArenaConfig,
    ) -> Result<Arena, ArenaError> {
        if config.log {
            init_logger();
        }
        Self::validate_roster(&agents)?;
        trace!(?config);

        let identities: Vec<AgentIdentity> =
            agents.iter().map(|a| a.identity().clone()).collect();
        let mut arena = Arena {
            agents,
            identities,
            referee: Referee::new(&config),
            move_logger,
            config,
            rng: Self::build_rng(&config),
            phase: SessionPhase::NotStarted,
            history: vec![],
            cumulative: HashMap::new(),
            series: HashMap::new(),
            winners: vec![],
            run_date: utc_timestamp(),
        };
        arena.initialize();
        Ok(arena)
    }

    fn validate_roster(agents: &[Box<dyn Agent>]) -> Result<(), ArenaError> {
        let personas: Vec<Persona> = agents.iter().map(|a| a.identity().persona).collect();
        let mut sorted = personas.clone();
        sorted.sort();
        sorted.dedup();
        if personas.len() != Persona::ALL.len() || sorted.len() != Persona::ALL.len() {
            return Err(ArenaError::InvalidInput(format!(
                "roster must be exactly {:?}, got {personas:?}",
                Persona::ALL
            )));
        }
        Ok(())
    }

    fn build_rng(config: &ArenaConfig) -> ChaCha8Rng {
        match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        }
    }

    /// Zero scores, clear history, enter `InProgress(1)`.
    fn initialize(&mut self) {
        self.history.clear();
        self.winners.clear();
        self.cumulative.clear();
        self.series.clear();
        for identity in &self.identities {
            self.cumulative.insert(identity.persona, 0.0);
            self.series.insert(identity.persona, vec![0.0]);
        }
        self.phase = if self.config.rounds == 0 {
            SessionPhase::Completed
        } else {
            SessionPhase::InProgress(1)
        };
        info!(run_date = %self.run_date, rounds = self.config.rounds, "session initialized");
    }

    /// Discard all session state and re-initialize under `config`.
    ///
    /// The same agent instances keep playing; scores, history, the round
    /// counter, and the starter RNG all reset.
    pub fn restart(&mut self, config: ArenaConfig) {
        info!("session restarted");
        self.phase = SessionPhase::NotStarted;
        self.referee = Referee::new(&config);
        self.rng = Self::build_rng(&config);
        self.config = config;
        self.run_date = utc_timestamp();
        self.initialize();
    }

    /// Turn order for this round: the starter leads, the rest follow in the
    /// declared roster order.
    fn turn_order(&mut self) -> Vec<usize> {
        let starter_index = match self.config.starter_policy {
            StarterPolicy::Random => self.rng.random_range(0..self.agents.len()),
            StarterPolicy::Manual(persona) => self
                .identities
                .iter()
                .position(|id| id.persona == persona)
                .unwrap_or(0),
        };
        (0..self.agents.len())
            .map(|i| (starter_index + i) % self.agents.len())
            .collect()
    }

    /// Run one full round: order agents, collect guesses, score, record,
    /// log, advance.
    ///
    /// A guess-collection failure aborts the round atomically; nothing is
    /// committed and the same round may be retried by calling again.
    ///
    /// # Errors
    /// - [`ArenaError::SessionComplete`] if the final round already ran.
    /// - [`ArenaError::AgentUnavailable`] if an agent call failed.
    /// - [`ArenaError::InvalidInput`] if the referee rejected the guess set.
    #[instrument(skip(self))]
    pub fn run_turn(&mut self) -> Result<&RoundRecord, ArenaError> {
        let round = match self.phase {
            SessionPhase::InProgress(k) => k,
            _ => {
                return Err(ArenaError::SessionComplete {
                    final_round: self.config.rounds,
                })
            }
        };

        let order = self.turn_order();
        let starter = self.identities[order[0]].persona;
        debug!(round, %starter, "collecting guesses");

        // Collect every guess before touching any session state.
        let mut moves = Vec::with_capacity(order.len());
        for &index in &order {
            let identity = self.identities[index].clone();
            let view = HistoryView {
                round,
                temperature: identity.temperature,
                records: &self.history,
            };
            let proposed = self.agents[index].propose_guess(view).map_err(|source| {
                warn!(round, persona = %identity.persona, "agent call failed, aborting round");
                ArenaError::AgentUnavailable {
                    persona: identity.persona,
                    source,
                }
            })?;
            trace!(persona = %identity.persona, guess = proposed.guess);
            moves.push((identity, proposed));
        }

        let guesses: HashMap<Persona, f64> = moves
            .iter()
            .map(|(identity, proposed)| {
                let clamped = proposed
                    .guess
                    .clamp(self.config.guess_min, self.config.guess_max);
                (identity.persona, clamped)
            })
            .collect();

        let roster: Vec<Persona> = self.identities.iter().map(|id| id.persona).collect();
        let outcome = self.referee.compute_round(&roster, &guesses)?;

        let entries: Vec<MoveEntry> = moves
            .into_iter()
            .map(|(identity, proposed)| {
                let persona = identity.persona;
                let applied = guesses[&persona];
                let delta = outcome.scores[&persona];
                MoveEntry {
                    post_score: self.cumulative[&persona] + delta,
                    identity,
                    guess: proposed.guess,
                    applied_guess: applied,
                    strategy: proposed.strategy,
                    public_message: proposed.public_message,
                    score_delta: delta,
                }
            })
            .collect();

        let record = RoundRecord {
            round,
            starter,
            moves: entries,
            target: outcome.target,
        };

        // Point of no return: the round is complete once committed here.
        for entry in &record.moves {
            let persona = entry.identity.persona;
            *self.cumulative.get_mut(&persona).unwrap() = entry.post_score;
            self.series.get_mut(&persona).unwrap().push(entry.post_score);
        }
        let target = record.target;
        self.history.push(record);

        if let Err(e) = self
            .move_logger
            .record(&self.run_date, self.history.last().unwrap())
        {
            warn!(round, "failed to log round: {e:#}");
        }

        if round == self.config.rounds {
            self.phase = SessionPhase::Completed;
            self.mark_winners();
        } else {
            self.phase = SessionPhase::InProgress(round + 1);
        }
        info!(round, target, "round complete");
        Ok(self.history.last().unwrap())
    }

    /// Every persona tied at the highest cumulative score wins.
    fn mark_winners(&mut self) {
        let best = self
            .cumulative
            .values()
            .fold(f64::NEG_INFINITY, |acc, &s| acc.max(s));
        self.winners = self
            .identities
            .iter()
            .map(|id| id.persona)
            .filter(|p| self.cumulative[p] == best)
            .collect();
        info!(winners = ?self.winners, "game over");
    }

    /// Run rounds until the session completes or a round fails.
    ///
    /// On failure the error is surfaced and every previously completed
    /// round is preserved; the failed round may be retried with
    /// [`Arena::run_turn`].
    pub fn run_simulation(&mut self) -> Result<(), ArenaError> {
        while matches!(self.phase, SessionPhase::InProgress(_)) {
            self.run_turn()?;
        }
        Ok(())
    }

    /// Current phase of the session.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The round `run_turn` would execute next, if any.
    pub fn current_round(&self) -> Option<u32> {
        match self.phase {
            SessionPhase::InProgress(k) => Some(k),
            _ => None,
        }
    }

    /// All completed rounds, oldest first.
    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    /// Running totals per persona.
    pub fn cumulative_scores(&self) -> &HashMap<Persona, f64> {
        &self.cumulative
    }

    /// Cumulative score after each round for one persona, starting at 0.0.
    pub fn score_series(&self, persona: Persona) -> Option<&[f64]> {
        self.series.get(&persona).map(Vec::as_slice)
    }

    /// The fixed roster, in declared order.
    pub fn roster(&self) -> &[AgentIdentity] {
        &self.identities
    }

    /// Configuration in effect for this session.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Personas tied at the highest score. Empty until the session
    /// completes.
    pub fn winners(&self) -> &[Persona] {
        &self.winners
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::Completed
    }

    /// Timestamp identifying this run in persisted move rows.
    pub fn run_date(&self) -> &str {
        &self.run_date
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("phase", &self.phase)
            .field("roster", &self.identities)
            .field("cumulative", &self.cumulative)
            .finish()
    }
}

#[cfg(test)]
mod arena_tests {
    use super::*;
    use crate::agent::Move;
    use crate::move_logger::MemoryMoveLogger;

    struct FixedAgent {
        identity: AgentIdentity,
        guess: f64,
    }

    impl Agent for FixedAgent {
        fn identity(&self) -> &AgentIdentity {
            &self.identity
        }

        fn propose_guess(&mut self, _view: HistoryView<'_>) -> anyhow::Result<Move> {
            Ok(Move::from_guess(self.guess))
        }
    }

    fn roster(guesses: [f64; 3]) -> Vec<Box<dyn Agent>> {
        Persona::ALL
            .iter()
            .zip(guesses)
            .map(|(&persona, guess)| {
                Box::new(FixedAgent {
                    identity: AgentIdentity::new(persona, 0.7),
                    guess,
                }) as Box<dyn Agent>
            })
            .collect()
    }

    fn arena(config: ArenaConfig) -> Arena {
        Arena::new(
            roster([50.0, 30.0, 10.0]),
            Box::new(MemoryMoveLogger::new()),
            config,
        )
        .unwrap()
    }

    #[test]
    fn duplicate_personas_are_rejected() {
        let agents: Vec<Box<dyn Agent>> = vec![
            Box::new(FixedAgent {
                identity: AgentIdentity::new(Persona::Vanilla, 0.7),
                guess: 1.0,
            }),
            Box::new(FixedAgent {
                identity: AgentIdentity::new(Persona::Vanilla, 0.7),
                guess: 2.0,
            }),
            Box::new(FixedAgent {
                identity: AgentIdentity::new(Persona::Strategic, 0.7),
                guess: 3.0,
            }),
        ];
        let result = Arena::new(agents, Box::new(MemoryMoveLogger::new()), ArenaConfig::new());
        assert!(matches!(result, Err(ArenaError::InvalidInput(_))));
    }

    #[test]
    fn manual_starter_leads_turn_order() {
        let config = ArenaConfig::new()
            .with_starter_policy(StarterPolicy::Manual(Persona::Aggressor));
        let mut arena = arena(config);
        let record = arena.run_turn().unwrap();
        assert_eq!(record.starter, Persona::Aggressor);
        let order: Vec<Persona> = record.moves.iter().map(|m| m.identity.persona).collect();
        assert_eq!(
            order,
            vec![Persona::Aggressor, Persona::Vanilla, Persona::Strategic]
        );
    }

    #[test]
    fn seeded_random_starter_replays_identically() {
        let config = ArenaConfig::new()
            .with_starter_policy(StarterPolicy::Random)
            .with_seed(7);
        let mut first = arena(config);
        let mut second = arena(config);
        first.run_simulation().unwrap();
        second.run_simulation().unwrap();
        let starters_a: Vec<Persona> = first.history().iter().map(|r| r.starter).collect();
        let starters_b: Vec<Persona> = second.history().iter().map(|r| r.starter).collect();
        assert_eq!(starters_a, starters_b);
    }

    #[test]
    fn guesses_are_clamped_before_scoring() {
        let mut arena = Arena::new(
            roster([150.0, -20.0, 50.0]),
            Box::new(MemoryMoveLogger::new()),
            ArenaConfig::new(),
        )
        .unwrap();
        let record = arena.run_turn().unwrap();
        let vanilla = record.entry(Persona::Vanilla).unwrap();
        assert_eq!(vanilla.guess, 150.0);
        assert_eq!(vanilla.applied_guess, 100.0);
        assert_eq!(record.entry(Persona::Strategic).unwrap().applied_guess, 0.0);
        // target from the clamped set: 0.7 * mean(100, 0, 50)
        assert!((record.target - 35.0).abs() < 1e-9);
    }

    #[test]
    fn zero_round_session_completes_immediately() {
        let mut arena = arena(ArenaConfig::new().with_rounds(0));
        assert!(arena.is_game_over());
        assert!(matches!(
            arena.run_turn(),
            Err(ArenaError::SessionComplete { .. })
        ));
    }
}
