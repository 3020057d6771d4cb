use std::path::Path;

use cutover_core::models::table::Table;
use cutover_core::store::StoreClient;
use cutover_pipeline::paged::PagedReader;
use cutover_pipeline::status::{collect_status, StoreStatus};

use super::load_config;

/// Run the `status` command: show counts for both stores side by side.
pub async fn run(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let reader = PagedReader::new(config.cutover.page_size);

    let source = collect_status(&StoreClient::from_config(&config.source), &reader).await?;
    let target = collect_status(&StoreClient::from_config(&config.target), &reader).await?;

    println!("Cutover Status");
    println!("==============");
    println!("Source: {}", config.source.url);
    println!("Target: {}", config.target.url);
    println!();
    print!("{}", render(&source, &target));

    Ok(())
}

fn render(source: &StoreStatus, target: &StoreStatus) -> String {
    let mut out = format!("  {:<26}{:>10}{:>10}\n", "", "source", "target");
    for table in Table::IMPORT_ORDER {
        let get = |s: &StoreStatus| s.tables.get(&table).copied().unwrap_or(0);
        out.push_str(&format!(
            "  {:<26}{:>10}{:>10}\n",
            table.name(),
            get(source),
            get(target)
        ));
    }
    out.push_str(&format!(
        "  {:<26}{:>10}{:>10}\n",
        "identity accounts", source.accounts, target.accounts
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_lists_every_table_and_accounts() {
        let source = StoreStatus {
            tables: [(Table::Students, 2500)].into_iter().collect(),
            accounts: 2700,
        };
        let target = StoreStatus::default();

        let out = render(&source, &target);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 1 + Table::IMPORT_ORDER.len() + 1);
        assert!(lines.iter().any(|l| l.contains("students") && l.contains("2500")));
        assert!(lines.last().unwrap().contains("2700"));
    }
}
