//! Ban every account listed in a graduating-cohort file.

use tracing::{info, warn};

use cutover_core::error::Result;
use cutover_core::store::IdentityStore;

use crate::graduates::GraduateRecord;

/// 100 years; the identity provider has no permanent ban.
pub const GRADUATE_BAN_DURATION: &str = "876000h";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanFailure {
    pub user_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct BanReport {
    pub banned: usize,
    /// Records listed but not sent, in dry-run mode.
    pub skipped: usize,
    pub failures: Vec<BanFailure>,
}

/// Ban each record's account. Failures are collected per record and never
/// stop the loop. With `dry_run` no request is made.
pub async fn ban_graduates<S>(
    identity: &S,
    records: &[GraduateRecord],
    dry_run: bool,
) -> Result<BanReport>
where
    S: IdentityStore + ?Sized,
{
    let mut report = BanReport::default();

    for record in records {
        if dry_run {
            info!(user_id = %record.user_id, email = %record.email, "would ban account");
            report.skipped += 1;
            continue;
        }

        match identity
            .ban_account(&record.user_id, GRADUATE_BAN_DURATION)
            .await
        {
            Ok(()) => {
                info!(user_id = %record.user_id, email = %record.email, "account banned");
                report.banned += 1;
            }
            Err(e) => {
                warn!(user_id = %record.user_id, error = %e, "ban failed");
                report.failures.push(BanFailure {
                    user_id: record.user_id.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}
