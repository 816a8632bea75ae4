use super::BaseView;
use crate::domain::account::Account;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account as listed to administrators, with its role title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AccountView {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_locked: bool,
    pub role_title: Option<String>,
    pub creation_date: DateTime<Utc>,
}

impl BaseView for AccountView {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountCreateView {
    pub username: String,
    pub password: String,
    pub email: String,
    pub role_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountEditView {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_locked: bool,
    pub role_id: Option<i64>,
}

impl From<Account> for AccountEditView {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
            is_locked: account.is_locked,
            role_id: account.role_id,
        }
    }
}

/// Self-service edit of the signed-in account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileEditView {
    pub username: String,
    pub email: String,
    /// Current password, confirming the change.
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_serializing)]
    pub new_password: Option<String>,
}

impl From<Account> for ProfileEditView {
    fn from(account: Account) -> Self {
        Self {
            username: account.username,
            email: account.email,
            password: String::new(),
            new_password: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountRecoveryView {
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountResetView {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountLoginView {
    pub username: String,
    pub password: String,
    pub persistent: bool,
}
