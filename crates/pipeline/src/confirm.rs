//! The gate between read-only counting and the first destructive stage.

use cutover_core::error::Result;

use crate::TableCounts;

/// Asked once per run, after source counts are known and before the target
/// is touched. Returning `false` ends the run without changes.
pub trait Confirmation {
    fn confirm(&self, source_counts: &TableCounts) -> Result<bool>;
}

/// Fixed answer, for `--yes` and tests.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirmation for AutoConfirm {
    fn confirm(&self, _source_counts: &TableCounts) -> Result<bool> {
        Ok(self.0)
    }
}
