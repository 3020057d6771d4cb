//! Paginated full-table scans.

use tracing::debug;

use cutover_core::error::{CutoverError, Result};
use cutover_core::models::row::RowSet;
use cutover_core::models::table::Table;
use cutover_core::store::TableStore;

use crate::TableCounts;

/// Reads whole tables page by page, in primary-key order.
#[derive(Debug, Clone, Copy)]
pub struct PagedReader {
    page_size: usize,
}

impl PagedReader {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Fetch every row of `table`.
    ///
    /// When the store reports an exact total, reading continues until that
    /// many rows have arrived, even across pages shorter than requested (a
    /// store may cap rows per response below `page_size`). Without a total,
    /// the first short page ends the scan. Any request error, or a store that
    /// stops returning rows before its own total, aborts the scan; partial
    /// results are never returned.
    pub async fn fetch_all<S>(&self, store: &S, table: Table) -> Result<RowSet>
    where
        S: TableStore + ?Sized,
    {
        let mut rows = RowSet::new();
        let mut offset = 0;

        loop {
            let page = store.fetch_page(table, offset, self.page_size).await?;
            let received = page.rows.len();
            rows.extend(page.rows);
            debug!(%table, offset, received, "page received");

            match page.total {
                Some(total) if rows.len() as u64 >= total => break,
                Some(total) if received == 0 => {
                    return Err(CutoverError::Store(format!(
                        "read {table} returned {} of {total} rows",
                        rows.len()
                    )));
                }
                Some(_) => {}
                None if received < self.page_size => break,
                None => {}
            }
            offset += received;
        }

        Ok(rows)
    }

    /// Exact row count of `table` via a count-only request.
    pub async fn count<S>(&self, store: &S, table: Table) -> Result<u64>
    where
        S: TableStore + ?Sized,
    {
        store.count(table).await
    }

    /// Count every migrated table, in import order.
    pub async fn count_all<S>(&self, store: &S) -> Result<TableCounts>
    where
        S: TableStore + ?Sized,
    {
        let mut counts = TableCounts::new();
        for table in Table::IMPORT_ORDER {
            counts.insert(table, self.count(store, table).await?);
        }
        Ok(counts)
    }
}
