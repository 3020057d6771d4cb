use std::path::Path;

use cutover_core::store::StoreClient;
use cutover_pipeline::ban::{ban_graduates, GRADUATE_BAN_DURATION};
use cutover_pipeline::graduates::read_graduates_csv;
use tracing::info;

use super::load_target_config;
use super::prompt::ask;

/// Run the `ban-graduates` command. Only the target store is needed.
/// Per-account failures are listed but do not change the exit status.
pub async fn run(
    config_path: Option<&Path>,
    csv: &Path,
    dry_run: bool,
    force: bool,
) -> anyhow::Result<()> {
    let config = load_target_config(config_path)?;
    let records = read_graduates_csv(csv)?;
    info!("Read {} graduate(s) from {}", records.len(), csv.display());

    if records.is_empty() {
        println!("No graduates listed in {}.", csv.display());
        return Ok(());
    }

    let target = StoreClient::from_config(&config.target);
    println!("Target: {}", target.base_url());
    println!("{} account(s) to ban for {GRADUATE_BAN_DURATION}:", records.len());
    for record in &records {
        println!("  {}  {}  {}", record.user_id, record.email, record.display_name);
    }
    println!();

    if !dry_run && !force && !ask("Type 'yes' to ban these accounts: ")? {
        println!("Cancelled. No accounts were banned.");
        return Ok(());
    }

    let report = ban_graduates(&target, &records, dry_run).await?;
    if dry_run {
        println!("Dry run: {} account(s) listed, none banned.", report.skipped);
        return Ok(());
    }

    println!("Banned: {}", report.banned);
    if !report.failures.is_empty() {
        println!("Failed: {}", report.failures.len());
        for failure in &report.failures {
            println!("  {}: {}", failure.user_id, failure.reason);
        }
    }

    Ok(())
}
