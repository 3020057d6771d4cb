//! Cutover Pipeline: the stages of an identity cutover and the orchestrator
//! that sequences them.
//!
//! Every stage is an async function over the store traits from
//! `cutover_core::store` that returns a typed report or a fatal
//! [`CutoverError`](cutover_core::error::CutoverError). Only the
//! [`orchestrator`] decides whether the next stage runs.

pub mod ban;
pub mod confirm;
pub mod export;
pub mod graduates;
pub mod identity_import;
pub mod orchestrator;
pub mod paged;
pub mod promotion;
pub mod reset;
pub mod status;
pub mod table_import;
pub mod verify;

#[cfg(test)]
pub(crate) mod testing;

use std::collections::BTreeMap;

use cutover_core::models::table::Table;

/// Row counts keyed by table, iterated in import order.
pub type TableCounts = BTreeMap<Table, u64>;
