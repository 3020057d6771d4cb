//! Relational REST surface (`/rest/v1/<table>`).

use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_RANGE};
use tracing::debug;
use uuid::Uuid;

use crate::error::{CutoverError, Result};
use crate::models::row::{Row, RowSet};
use crate::models::table::{KeyKind, Table};
use crate::store::client::{send_checked, StoreClient};
use crate::store::{Page, TableStore};

#[async_trait]
impl TableStore for StoreClient {
    async fn fetch_page(&self, table: Table, offset: usize, limit: usize) -> Result<Page> {
        debug!(%table, offset, limit, "fetching page");
        let req = self
            .http
            .get(self.table_url(table.name()))
            .query(&[("select", "*"), ("order", "id.asc")])
            .query(&[("offset", offset), ("limit", limit)])
            .header("Prefer", "count=exact");

        let resp = send_checked(self.authed(req), &format!("read {table}")).await?;
        let total = content_range_total(resp.headers());
        let rows = resp
            .json::<RowSet>()
            .await
            .map_err(|e| CutoverError::Store(format!("read {table} parse failed: {e}")))?;

        Ok(Page { rows, total })
    }

    async fn count(&self, table: Table) -> Result<u64> {
        let req = self
            .http
            .head(self.table_url(table.name()))
            .query(&[("select", "*")])
            .header("Prefer", "count=exact");

        let resp = send_checked(self.authed(req), &format!("count {table}")).await?;
        content_range_total(resp.headers()).ok_or_else(|| {
            CutoverError::Store(format!("count {table} returned no exact total"))
        })
    }

    async fn delete_all(&self, table: Table) -> Result<()> {
        // The REST surface refuses unfiltered deletes, so match every row by key.
        let filter = match table.key() {
            KeyKind::Serial => "gte.0".to_string(),
            KeyKind::Uuid => format!("neq.{}", Uuid::nil()),
        };
        let req = self
            .http
            .delete(self.table_url(table.name()))
            .query(&[("id", filter)])
            .header("Prefer", "return=minimal");

        send_checked(self.authed(req), &format!("delete {table}")).await?;
        Ok(())
    }

    async fn insert(&self, table: Table, rows: &[Row]) -> Result<()> {
        let req = self
            .http
            .post(self.table_url(table.name()))
            .header("Prefer", "return=minimal")
            .json(rows);

        send_checked(self.authed(req), &format!("insert {table}")).await?;
        Ok(())
    }

    async fn update_grade(&self, student_ids: &[i64], grade: i64) -> Result<()> {
        let ids = student_ids
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let req = self
            .http
            .patch(self.table_url(Table::Students.name()))
            .query(&[("id", format!("in.({ids})"))])
            .header("Prefer", "return=minimal")
            .json(&serde_json::json!({ "grade": grade }));

        send_checked(self.authed(req), "update students.grade").await?;
        Ok(())
    }
}

/// Extract the total from a `Content-Range: <range>/<total>` header.
/// Returns `None` when the header is absent or the total is `*`.
fn content_range_total(headers: &HeaderMap) -> Option<u64> {
    let value = headers.get(CONTENT_RANGE)?.to_str().ok()?;
    let (_, total) = value.rsplit_once('/')?;
    total.trim().parse().ok()
}
