// src/domain/role.rs
use crate::domain::model::{Model, Snapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

pub const ROLE_TITLE_MAX_LENGTH: usize = 128;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Role {
    pub id: i64,
    pub title: String,
    pub creation_date: DateTime<Utc>,
}

impl Role {
    pub fn new(title: impl Into<String>, creation_date: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            creation_date,
        }
    }
}

impl Model for Role {
    const NAME: &'static str = "Role";
    const TABLE: &'static str = "roles";
    const COLUMNS: &'static [&'static str] = &["title", "creation_date"];

    fn id(&self) -> i64 {
        self.id
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::new()
            .with("title", self.title.as_str())
            .with("creation_date", self.creation_date)
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Permission {
    pub id: i64,
    pub area: Option<String>,
    pub controller: String,
    pub action: String,
    pub creation_date: DateTime<Utc>,
}

impl Permission {
    pub fn new(key: &PermissionKey, creation_date: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            area: key.area.clone(),
            controller: key.controller.clone(),
            action: key.action.clone(),
            creation_date,
        }
    }

    pub fn key(&self) -> PermissionKey {
        PermissionKey::new(self.area.as_deref(), &self.controller, &self.action)
    }
}

impl Model for Permission {
    const NAME: &'static str = "Permission";
    const TABLE: &'static str = "permissions";
    const COLUMNS: &'static [&'static str] = &["area", "controller", "action", "creation_date"];

    fn id(&self) -> i64 {
        self.id
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::new()
            .with("area", self.area.clone())
            .with("controller", self.controller.as_str())
            .with("action", self.action.as_str())
            .with("creation_date", self.creation_date)
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct RolePermission {
    pub id: i64,
    pub role_id: i64,
    pub permission_id: i64,
    pub creation_date: DateTime<Utc>,
}

impl RolePermission {
    pub fn new(role_id: i64, permission_id: i64, creation_date: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            role_id,
            permission_id,
            creation_date,
        }
    }
}

impl Model for RolePermission {
    const NAME: &'static str = "RolePermission";
    const TABLE: &'static str = "role_permissions";
    const COLUMNS: &'static [&'static str] = &["role_id", "permission_id", "creation_date"];

    fn id(&self) -> i64 {
        self.id
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::new()
            .with("role_id", self.role_id)
            .with("permission_id", self.permission_id)
            .with("creation_date", self.creation_date)
    }
}

/// Area/controller/action triple identifying a protected action.
///
/// Keys compare case-insensitively; the parts are kept as given for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionKey {
    pub area: Option<String>,
    pub controller: String,
    pub action: String,
}

impl PermissionKey {
    pub fn new(area: Option<&str>, controller: &str, action: &str) -> Self {
        Self {
            area: area.filter(|a| !a.is_empty()).map(str::to_owned),
            controller: controller.to_owned(),
            action: action.to_owned(),
        }
    }

    fn normalized(&self) -> (String, String, String) {
        (
            self.area.as_deref().unwrap_or_default().to_lowercase(),
            self.controller.to_lowercase(),
            self.action.to_lowercase(),
        )
    }
}

impl PartialEq for PermissionKey {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl Eq for PermissionKey {}

impl std::hash::Hash for PermissionKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.area {
            Some(area) => write!(f, "{area}/{}/{}", self.controller, self.action),
            None => write!(f, "{}/{}", self.controller, self.action),
        }
    }
}
