use super::{
    change_tracker::{ChangeEntry, EntityState},
    error::map_sqlx,
};
use crate::application::ports::time::Clock;
use crate::domain::{audit::AuditLog, errors::DomainResult};
use async_trait::async_trait;
use sqlx::SqliteConnection;
use std::sync::Arc;

/// Records before/after state of committed changes.
///
/// The unit of work calls `log` with every pending entry before writing,
/// then either `save` (inside the same transaction, after the entity writes
/// succeeded) or `discard`.
#[async_trait]
pub trait AuditLogger: Send + Sync {
    fn log(&mut self, entries: &[ChangeEntry]);

    /// `entries` are the logged entries with their assigned ids and
    /// resolved references.
    async fn save(&mut self, conn: &mut SqliteConnection, entries: &[ChangeEntry])
    -> DomainResult<()>;

    fn discard(&mut self);
}

struct PendingLog {
    entry_index: usize,
    log: AuditLog,
}

pub struct SqlAuditLogger {
    account_id: Option<i64>,
    clock: Arc<dyn Clock>,
    pending: Vec<PendingLog>,
}

impl SqlAuditLogger {
    pub fn new(account_id: Option<i64>, clock: Arc<dyn Clock>) -> Self {
        Self {
            account_id,
            clock,
            pending: Vec::new(),
        }
    }

    pub fn pending(&self) -> impl Iterator<Item = &AuditLog> {
        self.pending.iter().map(|pending| &pending.log)
    }
}

#[async_trait]
impl AuditLogger for SqlAuditLogger {
    fn log(&mut self, entries: &[ChangeEntry]) {
        let now = self.clock.now();

        for (entry_index, entry) in entries.iter().enumerate() {
            let Some(action) = entry.state().audit_action() else {
                continue;
            };

            let changes = match serde_json::to_string(&entry.property_changes()) {
                Ok(changes) => changes,
                Err(err) => {
                    tracing::warn!(error = %err, entity = entry.entity_name(), "failed to serialize audit changes");
                    continue;
                }
            };

            self.pending.push(PendingLog {
                entry_index,
                log: AuditLog {
                    id: 0,
                    account_id: self.account_id,
                    action: action.to_string(),
                    entity_name: entry.entity_name().to_string(),
                    entity_id: entry.entity_id(),
                    changes,
                    creation_date: now,
                },
            });
        }
    }

    async fn save(
        &mut self,
        conn: &mut SqliteConnection,
        entries: &[ChangeEntry],
    ) -> DomainResult<()> {
        for pending in self.pending.drain(..) {
            let entry = entries.get(pending.entry_index);
            let entity_id = entry.map_or(pending.log.entity_id, ChangeEntry::entity_id);
            let log = pending.log;
            // added values may hold ids assigned during the commit
            let changes = entry
                .filter(|entry| entry.state() == EntityState::Added)
                .and_then(|entry| serde_json::to_string(&entry.property_changes()).ok())
                .unwrap_or(log.changes);

            sqlx::query(
                r#"
                INSERT INTO audit_logs (account_id, action, entity_name, entity_id, changes, creation_date)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(log.account_id)
            .bind(log.action)
            .bind(log.entity_name)
            .bind(entity_id)
            .bind(changes)
            .bind(log.creation_date)
            .execute(&mut *conn)
            .await
            .map_err(map_sqlx)?;
        }

        Ok(())
    }

    fn discard(&mut self) {
        self.pending.clear();
    }
}
