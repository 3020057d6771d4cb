//! Identity-admin surface (`/auth/v1/admin/users`).

use async_trait::async_trait;
use tracing::debug;

use crate::error::{CutoverError, Result};
use crate::models::account::{AccountList, IdentityAccount, NewAccount};
use crate::store::client::{send_checked, StoreClient};
use crate::store::IdentityStore;

#[async_trait]
impl IdentityStore for StoreClient {
    async fn list_accounts(&self, page: u32, per_page: usize) -> Result<Vec<IdentityAccount>> {
        debug!(page, per_page, "listing identity accounts");
        let req = self
            .http
            .get(self.users_url())
            .query(&[("page", page as usize), ("per_page", per_page)]);

        let resp = send_checked(self.authed(req), "list accounts").await?;
        let list = resp
            .json::<AccountList>()
            .await
            .map_err(|e| CutoverError::Store(format!("list accounts parse failed: {e}")))?;
        Ok(list.users)
    }

    async fn create_account(&self, account: &NewAccount) -> Result<()> {
        let req = self.http.post(self.users_url()).json(account);
        send_checked(self.authed(req), &format!("create account {}", account.id)).await?;
        Ok(())
    }

    async fn delete_account(&self, id: &str) -> Result<()> {
        let req = self.http.delete(self.user_url(id));
        send_checked(self.authed(req), &format!("delete account {id}")).await?;
        Ok(())
    }

    async fn ban_account(&self, id: &str, duration: &str) -> Result<()> {
        let body = serde_json::json!({ "ban_duration": duration });
        let req = self.http.put(self.user_url(id)).json(&body);
        send_checked(self.authed(req), &format!("ban account {id}")).await?;
        Ok(())
    }
}
