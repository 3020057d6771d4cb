//! Error types for the cutover core crate.

use thiserror::Error;

use crate::models::parity::TableCheck;

/// Top-level error type for all cutover operations.
///
/// The variants after `Store` are pipeline aborts: each one stops the run
/// before any later stage executes.
#[derive(Debug, Error)]
pub enum CutoverError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("failed to wipe target table {table}: {reason}")]
    TableWipe { table: String, reason: String },

    #[error(
        "identity import failed for {} account(s) ({imported} imported): {}",
        failed_ids.len(),
        failed_ids.join(", ")
    )]
    IdentityImport {
        imported: usize,
        failed_ids: Vec<String>,
    },

    #[error("identity purge stalled in round {round}: all {attempted} deletions failed")]
    PurgeStalled { round: u32, attempted: usize },

    #[error("identity purge incomplete after {rounds} rounds: accounts remain on target")]
    PurgeIncomplete { rounds: u32 },

    #[error("insert into {table} failed at batch {batch_index}: {reason}")]
    BatchInsert {
        table: String,
        batch_index: usize,
        reason: String,
    },

    #[error(
        "row count mismatch on {} table(s): {}",
        mismatched(checks).len(),
        mismatched(checks).join(", ")
    )]
    ConsistencyMismatch { checks: Vec<TableCheck> },

    #[error("grade promotion failed at batch {batch_index}: {reason}")]
    Promotion { batch_index: usize, reason: String },
}

impl CutoverError {
    /// Whether this error is one of the pipeline abort conditions, as opposed
    /// to a transport, configuration or local I/O failure.
    pub fn is_abort(&self) -> bool {
        matches!(
            self,
            Self::TableWipe { .. }
                | Self::IdentityImport { .. }
                | Self::PurgeStalled { .. }
                | Self::PurgeIncomplete { .. }
                | Self::BatchInsert { .. }
                | Self::ConsistencyMismatch { .. }
                | Self::Promotion { .. }
        )
    }
}

fn mismatched(checks: &[TableCheck]) -> Vec<String> {
    checks
        .iter()
        .filter(|c| !c.ok())
        .map(|c| format!("{} (source={}, target={})", c.table, c.source, c.target))
        .collect()
}

/// A convenience Result alias that defaults to [`CutoverError`].
pub type Result<T> = std::result::Result<T, CutoverError>;
