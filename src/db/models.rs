use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// One credential set as stored in `gemini_accounts`.
///
/// Serializes with the column names so the service layer can hand rows out as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Account {
    pub id: i64,
    pub name: Option<String>,
    #[sqlx(rename = "secure_c_ses")]
    #[serde(rename = "secure_c_ses")]
    pub secure_session: String,
    #[sqlx(rename = "host_c_oses")]
    #[serde(rename = "host_c_oses")]
    pub host_session: Option<String>,
    #[sqlx(rename = "csesidx")]
    #[serde(rename = "csesidx")]
    pub session_index: String,
    pub config_id: String,
    pub is_active: bool,
    pub request_count: i64,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for [`AccountStore::add_account`](crate::db::AccountStore::add_account).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewAccount {
    pub name: Option<String>,
    #[serde(rename = "secure_c_ses")]
    pub secure_session: String,
    #[serde(rename = "host_c_oses")]
    pub host_session: Option<String>,
    #[serde(rename = "csesidx")]
    pub session_index: String,
    pub config_id: String,
}

impl NewAccount {
    pub fn new(
        secure_session: impl Into<String>,
        session_index: impl Into<String>,
        config_id: impl Into<String>,
    ) -> Self {
        Self {
            name: None,
            secure_session: secure_session.into(),
            host_session: None,
            session_index: session_index.into(),
            config_id: config_id.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_host_session(mut self, host_session: impl Into<String>) -> Self {
        self.host_session = Some(host_session.into());
        self
    }
}

/// Partial update of the mutable account columns.
///
/// `None` leaves a column untouched. The nullable columns (`name`, `host_c_oses`)
/// take `Some(None)` to write NULL. Keys that are not listed here are dropped
/// during deserialization.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AccountPatch {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, rename = "secure_c_ses", alias = "secureSession")]
    pub secure_session: Option<String>,
    #[serde(
        default,
        rename = "host_c_oses",
        alias = "hostSession",
        deserialize_with = "present"
    )]
    pub host_session: Option<Option<String>>,
    #[serde(default, rename = "csesidx", alias = "sessionIndex")]
    pub session_index: Option<String>,
    #[serde(default, alias = "configId")]
    pub config_id: Option<String>,
    #[serde(default, alias = "isActive")]
    pub is_active: Option<bool>,
}

/// A key that is present maps to `Some`, even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl AccountPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: Option<String>) -> Self {
        self.name = Some(name);
        self
    }

    pub fn secure_session(mut self, value: impl Into<String>) -> Self {
        self.secure_session = Some(value.into());
        self
    }

    pub fn host_session(mut self, value: Option<String>) -> Self {
        self.host_session = Some(value);
        self
    }

    pub fn session_index(mut self, value: impl Into<String>) -> Self {
        self.session_index = Some(value.into());
        self
    }

    pub fn config_id(mut self, value: impl Into<String>) -> Self {
        self.config_id = Some(value.into());
        self
    }

    pub fn is_active(mut self, active: bool) -> Self {
        self.is_active = Some(active);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.secure_session.is_none()
            && self.host_session.is_none()
            && self.session_index.is_none()
            && self.config_id.is_none()
            && self.is_active.is_none()
    }
}
