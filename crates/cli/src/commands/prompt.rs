use std::io::{self, BufRead, Write};

use cutover_core::error::Result;
use cutover_core::models::table::Table;
use cutover_pipeline::confirm::Confirmation;
use cutover_pipeline::TableCounts;

/// Prints the source counts, then asks on stdin unless `assume_yes` is set.
pub struct OperatorConfirmation {
    pub assume_yes: bool,
}

impl Confirmation for OperatorConfirmation {
    fn confirm(&self, source_counts: &TableCounts) -> Result<bool> {
        println!("Source counts");
        println!("-------------");
        print_counts(source_counts);
        println!();
        println!("The target store will be WIPED: every row in these tables and every");
        println!("identity account is deleted before the import.");

        if self.assume_yes {
            println!("--yes given, proceeding.");
            return Ok(true);
        }
        Ok(ask("Type 'yes' to continue: ")?)
    }
}

fn print_counts(counts: &TableCounts) {
    for table in Table::IMPORT_ORDER {
        println!(
            "  {:<26}{:>8}",
            table.name(),
            counts.get(&table).copied().unwrap_or(0)
        );
    }
}

/// Ask a yes/no question on stdin.
pub fn ask(question: &str) -> io::Result<bool> {
    print!("{question}");
    io::stdout().flush()?;
    read_answer(&mut io::stdin().lock())
}

/// Only the exact word `yes` (surrounding whitespace ignored) confirms.
fn read_answer<R: BufRead>(input: &mut R) -> io::Result<bool> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim() == "yes")
}
