//! Source export: every migrated table plus every identity account.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info};

use cutover_core::error::Result;
use cutover_core::models::account::IdentityAccount;
use cutover_core::models::row::{Row, RowSet};
use cutover_core::models::table::Table;
use cutover_core::store::{IdentityStore, TableStore};

use crate::paged::PagedReader;
use crate::TableCounts;

/// Everything read from the source store, held in memory for the run.
#[derive(Debug, Clone, Default)]
pub struct SourceExport {
    pub tables: BTreeMap<Table, RowSet>,
    pub accounts: Vec<IdentityAccount>,
}

impl SourceExport {
    pub fn rows(&self, table: Table) -> &[Row] {
        self.tables.get(&table).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Exported row count per table.
    pub fn counts(&self) -> TableCounts {
        Table::IMPORT_ORDER
            .into_iter()
            .map(|t| (t, self.rows(t).len() as u64))
            .collect()
    }

    /// Account email by external id, for joining onto relational rows.
    pub fn emails_by_id(&self) -> HashMap<&str, &str> {
        self.accounts
            .iter()
            .map(|a| (a.id.as_str(), a.email.as_deref().unwrap_or("")))
            .collect()
    }
}

/// Export every identity account through the provider's paginated listing.
///
/// Pages are 1-based; the listing ends on an empty page or a page shorter
/// than `page_size`.
pub async fn export_accounts<S>(identity: &S, page_size: usize) -> Result<Vec<IdentityAccount>>
where
    S: IdentityStore + ?Sized,
{
    let mut accounts = Vec::new();
    let mut page = 1u32;

    loop {
        let batch = identity.list_accounts(page, page_size).await?;
        let received = batch.len();
        accounts.extend(batch);
        debug!(page, received, "account page received");

        if received == 0 || received < page_size {
            break;
        }
        page += 1;
    }

    Ok(accounts)
}

/// Read every migrated table, then every identity account, from the source.
pub async fn export_source<S>(source: &S, reader: &PagedReader) -> Result<SourceExport>
where
    S: TableStore + IdentityStore + ?Sized,
{
    let mut export = SourceExport::default();

    for table in Table::IMPORT_ORDER {
        let rows = reader.fetch_all(source, table).await?;
        info!(%table, rows = rows.len(), "exported table");
        export.tables.insert(table, rows);
    }

    export.accounts = export_accounts(source, reader.page_size()).await?;
    info!(accounts = export.accounts.len(), "exported identity accounts");

    Ok(export)
}
