//! Immutable per-round records and the rows handed to move loggers.

use serde::{Deserialize, Serialize};

use crate::agent::{AgentIdentity, Persona};

/// One agent's finalized contribution to a round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveEntry {
    pub identity: AgentIdentity,
    /// Raw number returned by the agent.
    pub guess: f64,
    /// Guess after clamping into the arena bounds; this is what was scored.
    pub applied_guess: f64,
    #[serde(default)]
    pub strategy: String,
    #[serde(default)]
    pub public_message: String,
    /// Points awarded for this round.
    pub score_delta: f64,
    /// Cumulative score after this round.
    pub post_score: f64,
}

impl MoveEntry {
    pub fn distance(&self, target: f64) -> f64 {
        (self.applied_guess - target).abs()
    }
}

/// Snapshot of one completed round. Built once by the arena, appended to
/// the session history, and handed to the move logger; never mutated after.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundRecord {
    /// 1-based, strictly increasing.
    pub round: u32,
    pub starter: Persona,
    /// One entry per roster member, in the turn order of this round.
    pub moves: Vec<MoveEntry>,
    /// multiplier x mean of the applied guesses.
    pub target: f64,
}

impl RoundRecord {
    /// The entry for a given persona, if present.
    pub fn entry(&self, persona: Persona) -> Option<&MoveEntry> {
        self.moves.iter().find(|m| m.identity.persona == persona)
    }
}

/// One persisted row per (round, agent) pair. Field set mirrors what the
/// core computes; storage backends may add their own columns around it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRow {
    /// Timestamp identifying the session this row belongs to.
    pub run_date: String,
    pub round: u32,
    /// UTC time the row was written.
    pub timestamp: String,
    pub player: String,
    pub temperature: f32,
    pub guess: f64,
    pub applied_guess: f64,
    pub target: f64,
    pub distance: f64,
    pub score_delta: f64,
    pub post_score: f64,
    #[serde(default)]
    pub public_message: String,
}

impl MoveRow {
    /// Flatten a round record into its per-agent rows.
    pub fn from_record(run_date: &str, timestamp: &str, record: &RoundRecord) -> Vec<MoveRow> {
        record
            .moves
            .iter()
            .map(|entry| MoveRow {
                run_date: run_date.to_owned(),
                round: record.round,
                timestamp: timestamp.to_owned(),
                player: entry.identity.persona.to_string(),
                temperature: entry.identity.temperature,
                guess: entry.guess,
                applied_guess: entry.applied_guess,
                target: record.target,
                distance: entry.distance(record.target),
                score_delta: entry.score_delta,
                post_score: entry.post_score,
                public_message: entry.public_message.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod record_tests {
    use super::*;

    fn entry(persona: Persona, guess: f64) -> MoveEntry {
        MoveEntry {
            identity: AgentIdentity::new(persona, 0.7),
            guess,
            applied_guess: guess,
            strategy: String::new(),
            public_message: String::new(),
            score_delta: 0.0,
            post_score: 0.0,
        }
    }

    #[test]
    fn rows_cover_every_roster_member() {
        let record = RoundRecord {
            round: 3,
            starter: Persona::Vanilla,
            moves: vec![
                entry(Persona::Vanilla, 50.0),
                entry(Persona::Strategic, 30.0),
                entry(Persona::Aggressor, 10.0),
            ],
            target: 20.0,
        };
        let rows = MoveRow::from_record("2025-01-01T00:00:00Z", "2025-01-01T00:00:05Z", &record);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.round == 3));
        assert_eq!(rows[0].distance, 30.0);
        assert_eq!(rows[2].distance, 10.0);
    }

    #[test]
    fn entry_lookup_by_persona() {
        let record = RoundRecord {
            round: 1,
            starter: Persona::Strategic,
            moves: vec![entry(Persona::Strategic, 42.0), entry(Persona::Vanilla, 7.0)],
            target: 0.0,
        };
        assert_eq!(record.entry(Persona::Vanilla).unwrap().guess, 7.0);
        assert!(record.entry(Persona::Aggressor).is_none());
    }
}
