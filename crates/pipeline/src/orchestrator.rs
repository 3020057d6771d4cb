//! Sequences the cutover stages and decides, after each one, whether the
//! next runs. No stage calls another.

use chrono::{NaiveDateTime, Utc};
use tracing::info;

use cutover_core::config::TuningConfig;
use cutover_core::error::{CutoverError, Result};
use cutover_core::models::parity::TableCheck;
use cutover_core::store::{IdentityStore, TableStore};

use crate::confirm::Confirmation;
use crate::export::export_source;
use crate::identity_import::{clear_default_profiles, import_accounts, IdentityImportReport};
use crate::paged::PagedReader;
use crate::promotion::{promote_grades, PromotionPolicy, PromotionReport};
use crate::reset::{reset_target, PurgePolicy, ResetReport};
use crate::table_import::{import_tables, ImportReport};
use crate::verify::verify_target;
use crate::TableCounts;

/// Everything a completed run did, stage by stage.
#[derive(Debug, Clone)]
pub struct CutoverReport {
    pub source_counts: TableCounts,
    pub exported_accounts: usize,
    pub reset: ResetReport,
    pub identity: IdentityImportReport,
    pub cleared_profiles: u64,
    pub import: ImportReport,
    pub checks: Vec<TableCheck>,
    pub promotion: PromotionReport,
}

#[derive(Debug, Clone)]
pub enum CutoverOutcome {
    /// The operator declined; nothing on the target was touched.
    Declined { source_counts: TableCounts },
    Completed(Box<CutoverReport>),
}

/// One cutover from `source` to `target`.
pub struct Cutover<'a, S: ?Sized, T: ?Sized> {
    source: &'a S,
    target: &'a T,
    tuning: &'a TuningConfig,
}

impl<'a, S, T> Cutover<'a, S, T>
where
    S: TableStore + IdentityStore + ?Sized,
    T: TableStore + IdentityStore + ?Sized,
{
    pub fn new(source: &'a S, target: &'a T, tuning: &'a TuningConfig) -> Self {
        Self {
            source,
            target,
            tuning,
        }
    }

    pub async fn run(&self, confirmation: &dyn Confirmation) -> Result<CutoverOutcome> {
        self.run_at(confirmation, Utc::now().naive_utc()).await
    }

    /// Run every stage; `now` (UTC) names the cohort file.
    pub async fn run_at(
        &self,
        confirmation: &dyn Confirmation,
        now: NaiveDateTime,
    ) -> Result<CutoverOutcome> {
        let reader = PagedReader::new(self.tuning.page_size);

        let source_counts = reader.count_all(self.source).await?;
        info!(tables = source_counts.len(), "source counted");

        if !confirmation.confirm(&source_counts)? {
            info!("cutover declined; target untouched");
            return Ok(CutoverOutcome::Declined { source_counts });
        }

        let export = export_source(self.source, &reader).await?;

        let reset = reset_target(self.target, PurgePolicy::from(self.tuning)).await?;

        let identity = import_accounts(self.target, &export.accounts).await?;
        if !identity.is_complete() {
            return Err(CutoverError::IdentityImport {
                imported: identity.imported,
                failed_ids: identity.failed_ids,
            });
        }
        let cleared_profiles = clear_default_profiles(self.target).await?;

        let import = import_tables(self.target, &export, self.tuning.batch_size).await?;

        let checks = verify_target(self.target, &reader, &export.counts()).await?;

        let promotion = promote_grades(
            self.target,
            &reader,
            &export,
            &PromotionPolicy::from(self.tuning),
            now,
        )
        .await?;

        info!("cutover complete");
        Ok(CutoverOutcome::Completed(Box::new(CutoverReport {
            source_counts,
            exported_accounts: export.accounts.len(),
            reset,
            identity,
            cleared_profiles,
            import,
            checks,
            promotion,
        })))
    }
}
