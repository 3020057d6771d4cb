use std::path::Path;

use cutover_core::error::CutoverError;
use cutover_core::models::parity::TableCheck;
use cutover_core::store::StoreClient;
use cutover_pipeline::orchestrator::{Cutover, CutoverOutcome, CutoverReport};
use cutover_pipeline::promotion::GradeDistribution;
use super::load_config;
use super::prompt::OperatorConfirmation;

/// Run the `run` command: the full cutover from source to target.
pub async fn run(config_path: Option<&Path>, yes: bool) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let source = StoreClient::from_config(&config.source);
    let target = StoreClient::from_config(&config.target);

    println!("Identity Cutover");
    println!("================");
    println!("Source: {}", source.base_url());
    println!("Target: {}", target.base_url());
    println!();

    let gate = OperatorConfirmation { assume_yes: yes };
    let outcome = Cutover::new(&source, &target, &config.cutover)
        .run(&gate)
        .await;

    match outcome {
        Ok(CutoverOutcome::Declined { .. }) => {
            println!("Cancelled. No changes were made.");
            Ok(())
        }
        Ok(CutoverOutcome::Completed(report)) => {
            print_summary(&report);
            Ok(())
        }
        Err(e) => {
            print!("{}", failure_details(&e));
            Err(failure_error(e))
        }
    }
}

/// Extra transcript lines for a failed run. The error message itself is
/// left to the returned error, which `main` prints.
fn failure_details(err: &CutoverError) -> String {
    match err {
        CutoverError::ConsistencyMismatch { checks } => format!(
            "\n{}Grade promotion was skipped.\n\n",
            render_checks(checks)
        ),
        _ => String::new(),
    }
}

fn failure_error(err: CutoverError) -> anyhow::Error {
    let context = if err.is_abort() {
        "cutover aborted"
    } else {
        "cutover failed"
    };
    anyhow::Error::new(err).context(context)
}

fn render_checks(checks: &[TableCheck]) -> String {
    let mut out = format!("  {:<26}{:>8}{:>8}\n", "table", "source", "target");
    for check in checks {
        out.push_str(&format!(
            "  {:<26}{:>8}{:>8}  {}\n",
            check.table.name(),
            check.source,
            check.target,
            if check.ok() { "ok" } else { "MISMATCH" }
        ));
    }
    out
}

fn print_distribution(label: &str, distribution: &GradeDistribution) {
    let grades = distribution
        .by_grade
        .iter()
        .map(|(grade, n)| format!("grade {grade}: {n}"))
        .collect::<Vec<_>>()
        .join(", ");
    println!("{label:<8}{}", if grades.is_empty() { "no students" } else { grades.as_str() });
}

fn print_summary(report: &CutoverReport) {
    println!();
    println!("Cutover complete");
    println!("----------------");
    println!(
        "Target reset:     {} account(s) purged in {} round(s)",
        report.reset.purge.deleted_total(),
        report.reset.purge.rounds.len()
    );
    println!("Accounts:         {} imported", report.identity.imported);
    println!("Default profiles: {} removed", report.cleared_profiles);
    println!();
    print!("{}", render_checks(&report.checks));
    println!();

    let promotion = &report.promotion;
    println!("Grade promotion ({} student(s) promoted)", promotion.promoted);
    print_distribution("Before:", &promotion.before);
    print_distribution("After:", &promotion.after);
    match (&promotion.csv_path, &promotion.csv_warning) {
        (Some(path), _) => println!(
            "Graduating cohort: {} student(s) written to {}",
            promotion.graduates.len(),
            path.display()
        ),
        (None, Some(warning)) => println!("WARNING: graduating cohort not written: {warning}"),
        (None, None) => println!("Graduating cohort: none"),
    }
}
