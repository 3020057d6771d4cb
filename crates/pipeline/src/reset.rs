//! Target reset: empty every migrated table, then purge every identity account.

use tracing::{debug, info, warn};

use cutover_core::config::TuningConfig;
use cutover_core::error::{CutoverError, Result};
use cutover_core::models::table::Table;
use cutover_core::store::{IdentityStore, TableStore};

/// Bounds for the identity purge loop.
#[derive(Debug, Clone, Copy)]
pub struct PurgePolicy {
    pub max_rounds: u32,
    pub page_size: usize,
}

impl Default for PurgePolicy {
    fn default() -> Self {
        Self {
            max_rounds: 50,
            page_size: 1000,
        }
    }
}

impl From<&TuningConfig> for PurgePolicy {
    fn from(tuning: &TuningConfig) -> Self {
        Self {
            max_rounds: tuning.max_purge_rounds,
            page_size: tuning.purge_page_size,
        }
    }
}

/// Tally for one purge round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeRound {
    pub round: u32,
    pub listed: usize,
    pub deleted: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct PurgeReport {
    pub rounds: Vec<PurgeRound>,
}

impl PurgeReport {
    pub fn deleted_total(&self) -> usize {
        self.rounds.iter().map(|r| r.deleted).sum()
    }

    pub fn failed_total(&self) -> usize {
        self.rounds.iter().map(|r| r.failed).sum()
    }
}

#[derive(Debug, Clone, Default)]
pub struct WipeReport {
    /// Rows removed per table, in wipe order. Empty tables are listed with 0.
    pub deleted: Vec<(Table, u64)>,
}

#[derive(Debug, Clone, Default)]
pub struct ResetReport {
    pub wipe: WipeReport,
    pub purge: PurgeReport,
}

/// Empty every migrated table, children before parents.
///
/// Each table is counted first and only deleted when non-empty. Any failure,
/// counting included, aborts with [`CutoverError::TableWipe`].
pub async fn wipe_tables<S>(target: &S) -> Result<WipeReport>
where
    S: TableStore + ?Sized,
{
    let mut report = WipeReport::default();

    for table in Table::WIPE_ORDER {
        let existing = target.count(table).await.map_err(|e| wipe_error(table, e))?;
        if existing > 0 {
            target
                .delete_all(table)
                .await
                .map_err(|e| wipe_error(table, e))?;
            info!(%table, rows = existing, "wiped target table");
        } else {
            debug!(%table, "target table already empty");
        }
        report.deleted.push((table, existing));
    }

    Ok(report)
}

fn wipe_error(table: Table, err: CutoverError) -> CutoverError {
    CutoverError::TableWipe {
        table: table.to_string(),
        reason: err.to_string(),
    }
}

/// Delete every identity account on the target in bounded rounds.
///
/// Each round lists the first page of remaining accounts and deletes them one
/// by one. Individual failures are tolerated while the round makes progress;
/// a round where every deletion fails aborts with
/// [`CutoverError::PurgeStalled`]. Once the loop ends, a single-account
/// existence check must come back empty or the purge aborts with
/// [`CutoverError::PurgeIncomplete`].
pub async fn purge_accounts<S>(target: &S, policy: PurgePolicy) -> Result<PurgeReport>
where
    S: IdentityStore + ?Sized,
{
    let mut report = PurgeReport::default();

    for round in 1..=policy.max_rounds {
        let remaining = target.list_accounts(1, policy.page_size).await?;
        if remaining.is_empty() {
            break;
        }

        let listed = remaining.len();
        let mut failed = 0;
        for account in &remaining {
            if let Err(e) = target.delete_account(&account.id).await {
                warn!(round, id = %account.id, error = %e, "account deletion failed");
                failed += 1;
            }
        }

        let deleted = listed - failed;
        info!(round, listed, deleted, failed, "purge round finished");
        report.rounds.push(PurgeRound {
            round,
            listed,
            deleted,
            failed,
        });

        if deleted == 0 {
            return Err(CutoverError::PurgeStalled {
                round,
                attempted: listed,
            });
        }
    }

    let leftover = target.list_accounts(1, 1).await?;
    if !leftover.is_empty() {
        return Err(CutoverError::PurgeIncomplete {
            rounds: report.rounds.len() as u32,
        });
    }

    Ok(report)
}

/// Wipe the relational tables, then purge the identity accounts.
pub async fn reset_target<S>(target: &S, policy: PurgePolicy) -> Result<ResetReport>
where
    S: TableStore + IdentityStore + ?Sized,
{
    let wipe = wipe_tables(target).await?;
    let purge = purge_accounts(target, policy).await?;
    info!(
        accounts = purge.deleted_total(),
        rounds = purge.rounds.len(),
        "target reset complete"
    );
    Ok(ResetReport { wipe, purge })
}
