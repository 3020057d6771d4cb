use serde::{Deserialize, Serialize};

use crate::models::table::Table;

/// Row-count comparison for one migrated table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCheck {
    pub table: Table,
    pub source: u64,
    pub target: u64,
}

impl TableCheck {
    pub fn new(table: Table, source: u64, target: u64) -> Self {
        Self {
            table,
            source,
            target,
        }
    }

    pub fn ok(&self) -> bool {
        self.source == self.target
    }
}
