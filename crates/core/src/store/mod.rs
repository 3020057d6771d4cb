//! Async seams over the two remote surfaces of a store.
//!
//! Every pipeline stage talks to stores only through [`TableStore`] and
//! [`IdentityStore`], so stages can be exercised against in-memory fakes.

pub mod admin;
pub mod client;
pub mod rest;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::account::{IdentityAccount, NewAccount};
use crate::models::row::{Row, RowSet};
use crate::models::table::Table;

pub use client::StoreClient;

/// One page of a table scan.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub rows: RowSet,
    /// Exact table size, when the store reports it alongside the page.
    pub total: Option<u64>,
}

/// Relational table access.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Fetch up to `limit` rows starting at `offset`, ordered by `id` ascending.
    async fn fetch_page(&self, table: Table, offset: usize, limit: usize) -> Result<Page>;
    /// Exact row count, without transferring rows.
    async fn count(&self, table: Table) -> Result<u64>;
    /// Delete every row of the table in a single request.
    async fn delete_all(&self, table: Table) -> Result<()>;
    /// Insert rows verbatim in a single request.
    async fn insert(&self, table: Table, rows: &[Row]) -> Result<()>;
    /// Set `grade` on every listed student id in a single request.
    async fn update_grade(&self, student_ids: &[i64], grade: i64) -> Result<()>;
}

/// Identity provider admin access.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// List accounts; `page` is 1-based.
    async fn list_accounts(&self, page: u32, per_page: usize) -> Result<Vec<IdentityAccount>>;
    /// Create an account under an explicit id.
    async fn create_account(&self, account: &NewAccount) -> Result<()>;
    async fn delete_account(&self, id: &str) -> Result<()>;
    /// Block sign-in for `duration` (e.g. `"876000h"`).
    async fn ban_account(&self, id: &str, duration: &str) -> Result<()>;
}
