use super::BaseView;
use crate::domain::role::{Permission, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleView {
    pub id: i64,
    pub title: String,
    pub creation_date: DateTime<Utc>,
}

impl From<Role> for RoleView {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            title: role.title,
            creation_date: role.creation_date,
        }
    }
}

impl BaseView for RoleView {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Role with the ids of the permissions it grants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleEditView {
    pub id: i64,
    pub title: String,
    pub permission_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionView {
    pub id: i64,
    pub area: Option<String>,
    pub controller: String,
    pub action: String,
}

impl From<Permission> for PermissionView {
    fn from(permission: Permission) -> Self {
        Self {
            id: permission.id,
            area: permission.area,
            controller: permission.controller,
            action: permission.action,
        }
    }
}
