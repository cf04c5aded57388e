//! # Beauty Arena
//!
//! A modular Rust crate for running repeated Keynes "beauty contest" guessing
//! games between three scripted LLM personas.
//!
//! It provides:
//! - Session orchestration and per-round sequencing (`Arena`)
//! - Pure target/score computation (`Referee`)
//! - The guessing capability seam via the `Agent` trait
//! - Pluggable persistence via the `MoveLogger` trait (CSV or in-memory)
//!
//! Each session pits the Vanilla, Strategic, and Aggressor personas against
//! each other for a fixed number of rounds (10 by default). Every round,
//! each agent submits a number; the round target is a configured fraction of
//! the mean of the submissions, and agents score by closeness to it.
//!
//! The arena treats agents as opaque guess producers, so the same
//! orchestration drives real LLM-backed personas and scripted test bots
//! alike. Any prompt templating or provider client lives behind the
//! [`Agent`](crate::agent::Agent) implementation, never in the core.
//!
//! # Documentation Overview
//!
//! - For the session state machine and round lifecycle, see the [`arena`] module.
//! - For the scoring rules, see [`Referee`](crate::referee::Referee).
//! - For configuring round count, target rule, starter policy, and seeding,
//!   see [`ArenaConfig`](crate::configuration::ArenaConfig).
//! - For implementing custom competitors, check out the [`Agent`](crate::agent::Agent) trait.
//! - For persistence backends, see the [`move_logger`] module.
//!
//! # Usage Example
//!
//! Below is a minimal session with scripted agents and a CSV move log:
//!
//! ```no_run
//! use beauty_arena::prelude::*;
//!
//! struct Shaded(AgentIdentity, f64);
//!
//! impl Agent for Shaded {
//!     fn identity(&self) -> &AgentIdentity {
//!         &self.0
//!     }
//!     fn propose_guess(&mut self, view: HistoryView<'_>) -> anyhow::Result<Move> {
//!         // Shade towards the previous target, if there is one.
//!         let guess = view
//!             .records
//!             .last()
//!             .map(|r| r.target * self.1)
//!             .unwrap_or(50.0 * self.1);
//!         Ok(Move::from_guess(guess))
//!     }
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ArenaConfig::new()
//!         .with_starter_policy(StarterPolicy::Random)
//!         .with_seed(42);
//!
//!     let agents: Vec<Box<dyn Agent>> = vec![
//!         Box::new(Shaded(AgentIdentity::new(Persona::Vanilla, 0.7), 1.0)),
//!         Box::new(Shaded(AgentIdentity::new(Persona::Strategic, 0.7), 0.7)),
//!         Box::new(Shaded(AgentIdentity::new(Persona::Aggressor, 0.7), 0.5)),
//!     ];
//!     let logger = CsvMoveLogger::new("data/moves.csv");
//!
//!     let mut arena = Arena::new(agents, Box::new(logger), config)?;
//!     arena.run_simulation()?;
//!
//!     for (persona, score) in arena.cumulative_scores() {
//!         println!("{persona}: {score:.2}");
//!     }
//!     println!("winners: {:?}", arena.winners());
//!     Ok(())
//! }
//! ```

pub mod agent;
pub use anyhow;
pub mod arena;
pub mod configuration;
pub mod error;
mod logger;
pub mod move_logger;
pub mod record;
pub mod referee;

/// Commonly used types and traits for quick access.
///
/// Import this prelude to get started easily:
/// ```rust
/// use beauty_arena::prelude::*;
/// ```
///
/// Includes:
/// - [`Arena`](crate::arena::Arena) and [`SessionPhase`](crate::arena::SessionPhase)
/// - [`ArenaConfig`](crate::configuration::ArenaConfig) and [`StarterPolicy`](crate::configuration::StarterPolicy)
/// - the [`Agent`](crate::agent::Agent) trait and its supporting types
/// - the built-in [`move loggers`](crate::move_logger)
pub mod prelude {
    pub use crate::agent::{Agent, AgentIdentity, HistoryView, Move, Persona};
    pub use crate::arena::{Arena, SessionPhase};
    pub use crate::configuration::{ArenaConfig, StarterPolicy};
    pub use crate::error::ArenaError;
    pub use crate::move_logger::{CsvMoveLogger, JsonlMoveLogger, MemoryMoveLogger, MoveLogger};
    pub use crate::record::{MoveRow, RoundRecord};
    pub use crate::referee::Referee;
}
