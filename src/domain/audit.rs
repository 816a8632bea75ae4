// src/domain/audit.rs
use crate::domain::model::ColumnValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{fmt, str::FromStr};

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    Created,
    Edited,
    Deleted,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Created => "Created",
            AuditAction::Edited => "Edited",
            AuditAction::Deleted => "Deleted",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Created" => Ok(AuditAction::Created),
            "Edited" => Ok(AuditAction::Edited),
            "Deleted" => Ok(AuditAction::Deleted),
            other => Err(DomainError::Validation(format!(
                "unknown audit action '{other}'"
            ))),
        }
    }
}

/// Before/after value of one property in an audited change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyChange {
    pub property: String,
    pub before: ColumnValue,
    pub after: ColumnValue,
}

#[derive(Debug, Clone, FromRow)]
pub struct AuditLog {
    pub id: i64,
    pub account_id: Option<i64>,
    pub action: String,
    pub entity_name: String,
    pub entity_id: i64,
    /// JSON array of [`PropertyChange`].
    pub changes: String,
    pub creation_date: DateTime<Utc>,
}
