//! Row-count parity between what was exported and what landed on the target.

use tracing::{info, warn};

use cutover_core::error::{CutoverError, Result};
use cutover_core::models::parity::TableCheck;
use cutover_core::models::table::Table;
use cutover_core::store::TableStore;

use crate::paged::PagedReader;
use crate::TableCounts;

/// Compare counts for every migrated table. A table missing from either side
/// counts as zero rows. Any mismatch aborts with
/// [`CutoverError::ConsistencyMismatch`] carrying every check.
pub fn verify(source: &TableCounts, target: &TableCounts) -> Result<Vec<TableCheck>> {
    let checks: Vec<TableCheck> = Table::IMPORT_ORDER
        .into_iter()
        .map(|table| {
            let get = |counts: &TableCounts| counts.get(&table).copied().unwrap_or(0);
            TableCheck::new(table, get(source), get(target))
        })
        .collect();

    for check in checks.iter().filter(|c| !c.ok()) {
        warn!(
            table = %check.table,
            source = check.source,
            target = check.target,
            "row count mismatch"
        );
    }

    if checks.iter().all(TableCheck::ok) {
        info!(tables = checks.len(), "row counts match");
        Ok(checks)
    } else {
        Err(CutoverError::ConsistencyMismatch { checks })
    }
}

/// Count the target and compare against the exported counts.
pub async fn verify_target<S>(
    target: &S,
    reader: &PagedReader,
    exported: &TableCounts,
) -> Result<Vec<TableCheck>>
where
    S: TableStore + ?Sized,
{
    let landed = reader.count_all(target).await?;
    verify(exported, &landed)
}
