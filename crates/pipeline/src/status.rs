//! Read-only snapshot of a store: table counts and identity account count.

use cutover_core::error::Result;
use cutover_core::store::{IdentityStore, TableStore};

use crate::export::export_accounts;
use crate::paged::PagedReader;
use crate::TableCounts;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStatus {
    pub tables: TableCounts,
    pub accounts: usize,
}

pub async fn collect_status<S>(store: &S, reader: &PagedReader) -> Result<StoreStatus>
where
    S: TableStore + IdentityStore + ?Sized,
{
    let tables = reader.count_all(store).await?;
    let accounts = export_accounts(store, reader.page_size()).await?.len();
    Ok(StoreStatus { tables, accounts })
}
