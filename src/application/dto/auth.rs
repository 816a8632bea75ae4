use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::SystemTime;

/// Who is making the current request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Principal {
    pub account_id: Option<i64>,
}

impl Principal {
    pub fn anonymous() -> Self {
        Self { account_id: None }
    }

    pub fn authenticated(account_id: i64) -> Self {
        Self {
            account_id: Some(account_id),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.account_id.is_some()
    }
}

/// Decoded authentication ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthTicket {
    /// Account id in string form.
    pub name: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub persistent: bool,
}

impl AuthTicket {
    pub fn account_id(&self) -> Option<i64> {
        self.name.parse().ok()
    }
}

/// A `Set-Cookie` instruction for the authentication cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthCookie {
    pub name: String,
    pub value: String,
    /// `None` for a session cookie.
    pub expires: Option<DateTime<Utc>>,
    pub max_age: Option<i64>,
}

impl AuthCookie {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.max_age == Some(0) || self.expires.is_some_and(|expires| expires <= now)
    }

    pub fn to_header_value(&self) -> String {
        let mut header = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            self.name, self.value
        );
        if let Some(max_age) = self.max_age {
            header.push_str(&format!("; Max-Age={max_age}"));
        }
        if let Some(expires) = self.expires {
            let expires = httpdate::fmt_http_date(SystemTime::from(expires));
            header.push_str(&format!("; Expires={expires}"));
        }
        header
    }
}
