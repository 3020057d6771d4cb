//! Recreate every exported identity account on the target, ids preserved.

use tracing::{info, warn};

use cutover_core::error::Result;
use cutover_core::models::account::IdentityAccount;
use cutover_core::models::table::Table;
use cutover_core::store::{IdentityStore, TableStore};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityImportReport {
    pub imported: usize,
    pub failed_ids: Vec<String>,
}

impl IdentityImportReport {
    pub fn is_complete(&self) -> bool {
        self.failed_ids.is_empty()
    }
}

/// Create every account on the target. Failures are collected, not raised;
/// the orchestrator decides whether the run continues.
pub async fn import_accounts<S>(
    target: &S,
    accounts: &[IdentityAccount],
) -> Result<IdentityImportReport>
where
    S: IdentityStore + ?Sized,
{
    let mut report = IdentityImportReport::default();

    for account in accounts {
        match target.create_account(&account.to_create_request()).await {
            Ok(()) => report.imported += 1,
            Err(e) => {
                warn!(
                    id = %account.id,
                    email = account.email.as_deref().unwrap_or("-"),
                    error = %e,
                    "account import failed"
                );
                report.failed_ids.push(account.id.clone());
            }
        }
    }

    info!(
        imported = report.imported,
        failed = report.failed_ids.len(),
        "identity import finished"
    );
    Ok(report)
}

/// Remove the `profiles` rows the target provisions on account creation, so
/// the exported profiles can be inserted verbatim. Returns the rows removed.
pub async fn clear_default_profiles<S>(target: &S) -> Result<u64>
where
    S: TableStore + ?Sized,
{
    let provisioned = target.count(Table::Profiles).await?;
    if provisioned > 0 {
        target.delete_all(Table::Profiles).await?;
        info!(rows = provisioned, "removed auto-provisioned profiles");
    }
    Ok(provisioned)
}
