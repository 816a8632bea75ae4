use async_trait::async_trait;
use mvc_template::domain::errors::DomainResult;
use mvc_template::infrastructure::persistence::{AuditLogger, ChangeEntry};
use sqlx::SqliteConnection;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggerEvent {
    /// Entity names of the logged entries.
    Log(Vec<String>),
    /// Entity ids seen at save time.
    Save(Vec<i64>),
    Discard,
}

/// Logger that only records how the unit of work drives it.
#[derive(Debug, Clone, Default)]
pub struct RecordingAuditLogger {
    events: Arc<Mutex<Vec<LoggerEvent>>>,
}

impl RecordingAuditLogger {
    pub fn events(&self) -> Vec<LoggerEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn saves(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, LoggerEvent::Save(_)))
            .count()
    }
}

#[async_trait]
impl AuditLogger for RecordingAuditLogger {
    fn log(&mut self, entries: &[ChangeEntry]) {
        let names = entries
            .iter()
            .map(|entry| entry.entity_name().to_string())
            .collect();
        self.events.lock().unwrap().push(LoggerEvent::Log(names));
    }

    async fn save(
        &mut self,
        _conn: &mut SqliteConnection,
        entries: &[ChangeEntry],
    ) -> DomainResult<()> {
        let ids = entries.iter().map(ChangeEntry::entity_id).collect();
        self.events.lock().unwrap().push(LoggerEvent::Save(ids));
        Ok(())
    }

    fn discard(&mut self) {
        self.events.lock().unwrap().push(LoggerEvent::Discard);
    }
}
