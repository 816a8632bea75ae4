use crate::domain::audit::AuditLog;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogView {
    pub id: i64,
    pub account_id: Option<i64>,
    pub action: String,
    pub entity_name: String,
    pub entity_id: i64,
    pub changes: serde_json::Value,
    pub creation_date: DateTime<Utc>,
}

impl From<AuditLog> for AuditLogView {
    fn from(log: AuditLog) -> Self {
        let changes = serde_json::from_str(&log.changes).unwrap_or(serde_json::Value::Null);
        Self {
            id: log.id,
            account_id: log.account_id,
            action: log.action,
            entity_name: log.entity_name,
            entity_id: log.entity_id,
            changes,
            creation_date: log.creation_date,
        }
    }
}
