//! Error taxonomy of the orchestration core.

use thiserror::Error;

use crate::agent::Persona;

/// Errors surfaced by the referee and the arena.
///
/// Logging failures are deliberately absent: a round that scored but could
/// not be persisted is still complete, so the arena only warns about it.
#[derive(Error, Debug)]
pub enum ArenaError {
    /// A malformed guess set reached the referee: a roster member is
    /// missing, a stranger is present, or a value is NaN/infinite.
    #[error("invalid guess set: {0}")]
    InvalidInput(String),

    /// An external agent call failed mid-round. The round is aborted
    /// atomically; session state is unchanged and `run_turn` may be
    /// re-invoked for a manual retry.
    #[error("agent {persona} unavailable: {source}")]
    AgentUnavailable {
        persona: Persona,
        #[source]
        source: anyhow::Error,
    },

    /// A round-advancing operation was invoked after the final round.
    #[error("session already completed after round {final_round}")]
    SessionComplete { final_round: u32 },
}
