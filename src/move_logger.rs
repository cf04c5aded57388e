//! Persistence adapters for completed rounds.
//!
//! The arena only knows the [`MoveLogger`] trait, so storage backends
//! (file, database, in-memory) can be swapped without touching the
//! orchestration core. Logging failures are non-fatal: the arena warns and
//! moves on.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::record::{MoveRow, RoundRecord};

/// Accepts a finalized round record and persists it, one row per
/// (round, agent) pair.
pub trait MoveLogger {
    /// Persist every move of the given round.
    ///
    /// # Errors
    /// Any storage error. The arena reports it as a warning and considers
    /// the round complete regardless.
    fn record(&mut self, run_date: &str, record: &RoundRecord) -> anyhow::Result<()>;
}

const CSV_HEADERS: [&str; 12] = [
    "run_date",
    "round",
    "timestamp",
    "player",
    "temperature",
    "guess",
    "applied_guess",
    "target",
    "distance",
    "score_delta",
    "post_score",
    "public_message",
];

/// Append-only CSV logger. The file and its header row are created on
/// first write if absent.
pub struct CsvMoveLogger {
    path: PathBuf,
}

impl CsvMoveLogger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        CsvMoveLogger {
            path: path.as_ref().to_owned(),
        }
    }

    fn escape(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_owned()
        }
    }

    fn format_row(row: &MoveRow) -> String {
        [
            Self::escape(&row.run_date),
            row.round.to_string(),
            Self::escape(&row.timestamp),
            Self::escape(&row.player),
            row.temperature.to_string(),
            row.guess.to_string(),
            row.applied_guess.to_string(),
            row.target.to_string(),
            row.distance.to_string(),
            row.score_delta.to_string(),
            row.post_score.to_string(),
            Self::escape(&row.public_message),
        ]
        .join(",")
    }
}

impl MoveLogger for CsvMoveLogger {
    fn record(&mut self, run_date: &str, record: &RoundRecord) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let write_header = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;

        if write_header {
            writeln!(file, "{}", CSV_HEADERS.join(","))?;
        }

        let timestamp = crate::arena::utc_timestamp();
        for row in MoveRow::from_record(run_date, &timestamp, record) {
            writeln!(file, "{}", Self::format_row(&row))?;
        }
        debug!(round = record.round, path = %self.path.display(), "round logged");
        Ok(())
    }
}

/// Append-only JSON Lines logger, one serialized [`MoveRow`] per line.
/// Stand-in for document-store backends behind the same trait.
pub struct JsonlMoveLogger {
    path: PathBuf,
}

impl JsonlMoveLogger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonlMoveLogger {
            path: path.as_ref().to_owned(),
        }
    }
}

impl MoveLogger for JsonlMoveLogger {
    fn record(&mut self, run_date: &str, record: &RoundRecord) -> anyhow::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;

        let timestamp = crate::arena::utc_timestamp();
        for row in MoveRow::from_record(run_date, &timestamp, record) {
            writeln!(file, "{}", serde_json::to_string(&row)?)?;
        }
        debug!(round = record.round, path = %self.path.display(), "round logged");
        Ok(())
    }
}

/// In-memory logger. Used by tests and by UIs that render moves directly.
#[derive(Debug, Default)]
pub struct MemoryMoveLogger {
    rows: Vec<MoveRow>,
}

impl MemoryMoveLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[MoveRow] {
        &self.rows
    }
}

impl MoveLogger for MemoryMoveLogger {
    fn record(&mut self, run_date: &str, record: &RoundRecord) -> anyhow::Result<()> {
        let timestamp = crate::arena::utc_timestamp();
        self.rows
            .extend(MoveRow::from_record(run_date, &timestamp, record));
        Ok(())
    }
}
