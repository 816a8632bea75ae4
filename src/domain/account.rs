// src/domain/account.rs
use crate::domain::model::{Model, Snapshot};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const USERNAME_MAX_LENGTH: usize = 32;
pub const EMAIL_MAX_LENGTH: usize = 256;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Account {
    pub id: i64,
    pub username: String,
    /// Lower-cased username, matched for sign-in and uniqueness.
    pub username_key: String,
    pub passhash: String,
    pub email: String,
    pub is_locked: bool,
    pub recovery_token: Option<String>,
    pub recovery_token_expiration_date: Option<DateTime<Utc>>,
    pub role_id: Option<i64>,
    pub creation_date: DateTime<Utc>,
}

impl Account {
    pub fn new(
        username: impl Into<String>,
        passhash: impl Into<String>,
        email: &str,
        role_id: Option<i64>,
        creation_date: DateTime<Utc>,
    ) -> Self {
        let username = username.into();
        Self {
            id: 0,
            username_key: normalize_username(&username),
            username,
            passhash: passhash.into(),
            email: normalize_email(email),
            is_locked: false,
            recovery_token: None,
            recovery_token_expiration_date: None,
            role_id,
            creation_date,
        }
    }

    pub fn set_username(&mut self, username: &str) {
        self.username = username.trim().to_owned();
        self.username_key = normalize_username(username);
    }

    pub fn set_email(&mut self, email: &str) {
        self.email = normalize_email(email);
    }

    pub fn issue_recovery_token(&mut self, token: String, expires_at: DateTime<Utc>) {
        self.recovery_token = Some(token);
        self.recovery_token_expiration_date = Some(expires_at);
    }

    pub fn clear_recovery_token(&mut self) {
        self.recovery_token = None;
        self.recovery_token_expiration_date = None;
    }

    pub fn is_recovery_token_expired(&self, now: DateTime<Utc>) -> bool {
        self.recovery_token_expiration_date
            .is_none_or(|expires_at| expires_at < now)
    }
}

/// Key usernames are compared by, folding case for every script.
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Emails are stored and compared lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Model for Account {
    const NAME: &'static str = "Account";
    const TABLE: &'static str = "accounts";
    const COLUMNS: &'static [&'static str] = &[
        "username",
        "username_key",
        "passhash",
        "email",
        "is_locked",
        "recovery_token",
        "recovery_token_expiration_date",
        "role_id",
        "creation_date",
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::new()
            .with("username", self.username.as_str())
            .with("username_key", self.username_key.as_str())
            .with("passhash", self.passhash.as_str())
            .with("email", self.email.as_str())
            .with("is_locked", self.is_locked)
            .with("recovery_token", self.recovery_token.clone())
            .with(
                "recovery_token_expiration_date",
                self.recovery_token_expiration_date,
            )
            .with("role_id", self.role_id)
            .with("creation_date", self.creation_date)
    }
}
