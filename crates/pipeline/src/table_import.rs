//! Batched, dependency-ordered insertion of exported rows into the target.

use tracing::{debug, info};

use cutover_core::error::{CutoverError, Result};
use cutover_core::models::row::Row;
use cutover_core::models::table::Table;
use cutover_core::store::TableStore;

use crate::export::SourceExport;
use crate::TableCounts;

/// Insert `rows` into `table` in sequential batches of `batch_size`.
///
/// An empty row set issues no request. The first failing batch aborts with
/// [`CutoverError::BatchInsert`]; earlier batches stay committed.
pub async fn import_table<S>(
    target: &S,
    table: Table,
    rows: &[Row],
    batch_size: usize,
) -> Result<usize>
where
    S: TableStore + ?Sized,
{
    let mut inserted = 0;

    for (batch_index, batch) in rows.chunks(batch_size.max(1)).enumerate() {
        target
            .insert(table, batch)
            .await
            .map_err(|e| CutoverError::BatchInsert {
                table: table.to_string(),
                batch_index,
                reason: e.to_string(),
            })?;
        inserted += batch.len();
        debug!(%table, batch_index, rows = batch.len(), "batch inserted");
    }

    Ok(inserted)
}

#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Rows sent per table, in import order.
    pub inserted: TableCounts,
}

/// Import every exported table, parents before children.
pub async fn import_tables<S>(
    target: &S,
    export: &SourceExport,
    batch_size: usize,
) -> Result<ImportReport>
where
    S: TableStore + ?Sized,
{
    let mut report = ImportReport::default();

    for table in Table::IMPORT_ORDER {
        let inserted = import_table(target, table, export.rows(table), batch_size).await?;
        info!(%table, rows = inserted, "imported table");
        report.inserted.insert(table, inserted as u64);
    }

    Ok(report)
}
