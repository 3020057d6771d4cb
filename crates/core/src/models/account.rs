//! Identity provider account records and admin API request/response structs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A credential-bearing account in the identity provider.
///
/// The `id` is the external identifier that relational rows reference; a
/// cutover recreates it on the target byte-for-byte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityAccount {
    pub id: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub email_confirmed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub phone_confirmed_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub user_metadata: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub app_metadata: Map<String, Value>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl IdentityAccount {
    /// Build the admin "create account" request that recreates this account
    /// under the same id. Passwords are not carried over.
    pub fn to_create_request(&self) -> NewAccount {
        NewAccount {
            id: self.id.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            email_confirm: self.email_confirmed_at.is_some(),
            phone_confirm: self.phone_confirmed_at.is_some(),
            user_metadata: self.user_metadata.clone(),
            app_metadata: self.app_metadata.clone(),
        }
    }
}

/// Body of `POST /auth/v1/admin/users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAccount {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub email_confirm: bool,
    pub phone_confirm: bool,
    pub user_metadata: Map<String, Value>,
    pub app_metadata: Map<String, Value>,
}

/// One page of `GET /auth/v1/admin/users`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountList {
    #[serde(default)]
    pub users: Vec<IdentityAccount>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const API_USER: &str = r#"{
        "id": "5b0c7c1e-6f3a-4c59-9a43-0d7f2a9b1e11",
        "aud": "authenticated",
        "role": "authenticated",
        "email": "hikaru6@studyspark.local",
        "phone": "",
        "email_confirmed_at": "2025-04-01T09:30:00Z",
        "user_metadata": {"role": "student", "login_id": "hikaru6"},
        "app_metadata": {"provider": "email", "providers": ["email"]},
        "created_at": "2025-04-01T09:29:58.123456Z"
    }"#;

    #[test]
    fn deserialize_from_admin_api_format() {
        let account: IdentityAccount = serde_json::from_str(API_USER).unwrap();
        assert_eq!(account.id, "5b0c7c1e-6f3a-4c59-9a43-0d7f2a9b1e11");
        assert_eq!(account.email.as_deref(), Some("hikaru6@studyspark.local"));
        assert!(account.phone.is_none(), "empty phone should be treated as absent");
        assert!(account.email_confirmed_at.is_some());
        assert!(account.phone_confirmed_at.is_none());
        assert_eq!(account.user_metadata["login_id"], "hikaru6");
        assert_eq!(account.app_metadata["provider"], "email");
    }

    #[test]
    fn create_request_preserves_id_flags_and_metadata() {
        let account: IdentityAccount = serde_json::from_str(API_USER).unwrap();
        let req = account.to_create_request();
        assert_eq!(req.id, account.id);
        assert!(req.email_confirm);
        assert!(!req.phone_confirm);
        assert_eq!(req.user_metadata, account.user_metadata);
        assert_eq!(req.app_metadata, account.app_metadata);

        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("phone").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(json["email_confirm"], true);
    }

    #[test]
    fn minimal_account_parses() {
        let account: IdentityAccount = serde_json::from_str(r#"{"id": "abc"}"#).unwrap();
        assert_eq!(account.id, "abc");
        assert!(account.email.is_none());
        assert!(account.user_metadata.is_empty());
    }

    #[test]
    fn null_metadata_becomes_empty_object() {
        let account: IdentityAccount =
            serde_json::from_str(r#"{"id": "abc", "user_metadata": null}"#).unwrap();
        assert!(account.user_metadata.is_empty());
    }

    #[test]
    fn account_list_missing_users_is_empty() {
        let list: AccountList = serde_json::from_str(r#"{"aud": "authenticated"}"#).unwrap();
        assert!(list.users.is_empty());
    }
}
