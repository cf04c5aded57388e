//! Personas, agent identities, and the guessing capability trait.
//!
//! The arena never talks to a language model directly. It only knows the
//! [`Agent`] trait: "given the visible game state, produce a guess". The
//! three built-in personas differ only in the strategy their backing
//! implementation applies, so any implementation (an LLM client, a scripted
//! bot in tests, ...) can join a session.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::RoundRecord;

/// The three competitor profiles of the arena.
///
/// The roster of a session is always exactly these three, though their
/// per-round order varies with the starter policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Persona {
    /// Baseline profile with no meta-reasoning.
    Vanilla,
    /// Deliberate profile that models the other players.
    Strategic,
    /// Offensive red-team profile.
    Aggressor,
}

impl Persona {
    /// Declared roster order, also the manual-starter tie order.
    pub const ALL: [Persona; 3] = [Persona::Vanilla, Persona::Strategic, Persona::Aggressor];

    /// Chart color associated with this persona in presentation layers.
    pub fn color(&self) -> &'static str {
        match self {
            Persona::Vanilla => "#778899",
            Persona::Strategic => "#1f77b4",
            Persona::Aggressor => "#B22222",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Persona::Vanilla => "Vanilla",
            Persona::Strategic => "Strategic",
            Persona::Aggressor => "Aggressor",
        };
        write!(f, "{name}")
    }
}

/// Immutable identity of a roster member: who they are and how their model
/// is sampled. Created at session start and never mutated mid-session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentIdentity {
    pub persona: Persona,
    pub color: String,
    pub temperature: f32,
}

impl AgentIdentity {
    pub fn new(persona: Persona, temperature: f32) -> Self {
        AgentIdentity {
            persona,
            color: persona.color().to_owned(),
            temperature,
        }
    }
}

impl fmt::Display for AgentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (temp {})", self.persona, self.temperature)
    }
}

/// A finalized move: the guess plus the free-text fields some
/// implementations report alongside it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Move {
    /// The submitted number, before clamping into the arena bounds.
    pub guess: f64,
    /// Private reasoning, persisted but never shown to other players.
    #[serde(default)]
    pub strategy: String,
    /// Optional message visible to the other players.
    #[serde(default)]
    pub public_message: String,
}

impl Move {
    pub fn from_guess(guess: f64) -> Self {
        Move {
            guess,
            ..Move::default()
        }
    }
}

/// Everything an agent is allowed to see when forming a guess: prior round
/// records, the current round number, and its own sampling temperature.
#[derive(Debug, Clone, Copy)]
pub struct HistoryView<'a> {
    pub round: u32,
    pub temperature: f32,
    pub records: &'a [RoundRecord],
}

/// The guessing capability consumed by the arena.
///
/// Implementations typically wrap an external language-model call; the
/// arena treats any returned error as "agent unavailable" and aborts the
/// round without retrying (retries, if any, belong to the implementation).
pub trait Agent {
    /// The identity this agent plays as.
    fn identity(&self) -> &AgentIdentity;

    /// Produce a guess from the visible history.
    ///
    /// # Errors
    /// Any error (network, parse, provider outage) aborts the current round.
    fn propose_guess(&mut self, view: HistoryView<'_>) -> anyhow::Result<Move>;
}
