//! Untyped relational rows, copied verbatim between stores.

use serde_json::{Map, Value};

/// One table row as returned by the relational REST surface.
pub type Row = Map<String, Value>;

/// All rows of one table, in primary-key order.
pub type RowSet = Vec<Row>;
