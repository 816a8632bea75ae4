pub mod audit_logger;
pub mod change_tracker;
pub mod error;
pub mod read_models;
pub mod unit_of_work;

pub use audit_logger::{AuditLogger, SqlAuditLogger};
pub use change_tracker::{ChangeEntry, ChangeTracker, EntityState, PendingKey};
pub use error::map_sqlx;
pub use unit_of_work::{CommitReport, Filter, UnitOfWork};
