use super::{
    audit_logger::AuditLogger,
    change_tracker::{ChangeEntry, ChangeTracker, EntityState, PendingKey},
    error::map_sqlx,
};
use crate::domain::{
    errors::{DomainError, DomainResult},
    model::{ColumnValue, Model},
};
use crate::infrastructure::database::DataContext;
use sqlx::SqliteConnection;

/// Row filter for [`UnitOfWork::select_where`].
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(&'static str, ColumnValue),
    /// Text comparison ignoring ASCII case.
    EqIgnoreCase(&'static str, String),
}

impl Filter {
    fn column(&self) -> &'static str {
        match self {
            Filter::Eq(column, _) | Filter::EqIgnoreCase(column, _) => column,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReport {
    /// Ids assigned to inserted entities, in insertion order.
    pub inserted_ids: Vec<i64>,
    pub updated: usize,
    pub deleted: usize,
}

impl CommitReport {
    pub fn first_inserted_id(&self) -> Option<i64> {
        self.inserted_ids.first().copied()
    }
}

macro_rules! bind_column {
    ($query:expr, $value:expr) => {
        match $value {
            ColumnValue::Null => $query.bind(None::<String>),
            ColumnValue::Bool(value) => $query.bind(value),
            ColumnValue::Integer(value) => $query.bind(value),
            ColumnValue::Real(value) => $query.bind(value),
            ColumnValue::Text(value) => $query.bind(value),
            ColumnValue::Timestamp(value) => $query.bind(value),
        }
    };
}

fn select_sql<M: Model>() -> String {
    format!("SELECT id, {} FROM {}", M::COLUMNS.join(", "), M::TABLE)
}

fn select_by_id_sql(entry: &ChangeEntry) -> String {
    format!(
        "SELECT id, {} FROM {} WHERE id = ?",
        entry.columns().join(", "),
        entry.table()
    )
}

pub struct UnitOfWork {
    context: DataContext,
    logger: Option<Box<dyn AuditLogger>>,
    tracker: ChangeTracker,
}

impl UnitOfWork {
    pub fn new(context: DataContext) -> Self {
        Self {
            context,
            logger: None,
            tracker: ChangeTracker::new(),
        }
    }

    pub fn with_logger(context: DataContext, logger: Box<dyn AuditLogger>) -> Self {
        Self {
            context,
            logger: Some(logger),
            tracker: ChangeTracker::new(),
        }
    }

    pub fn context(&self) -> &DataContext {
        &self.context
    }

    pub async fn get<M: Model>(&self, id: i64) -> DomainResult<Option<M>> {
        let sql = format!("{} WHERE id = ?", select_sql::<M>());
        sqlx::query_as::<_, M>(&sql)
            .bind(id)
            .fetch_optional(self.context.pool())
            .await
            .map_err(map_sqlx)
    }

    pub async fn get_as<M, V>(&self, id: i64) -> DomainResult<Option<V>>
    where
        M: Model,
        V: From<M>,
    {
        Ok(self.get::<M>(id).await?.map(V::from))
    }

    /// Projects a loaded entity (or any other source) into a view.
    pub fn to<V, S>(&self, source: S) -> V
    where
        V: From<S>,
    {
        V::from(source)
    }

    pub async fn select<M: Model>(&self) -> DomainResult<Vec<M>> {
        let sql = format!("{} ORDER BY id", select_sql::<M>());
        sqlx::query_as::<_, M>(&sql)
            .fetch_all(self.context.pool())
            .await
            .map_err(map_sqlx)
    }

    pub async fn select_where<M: Model>(&self, filter: Filter) -> DomainResult<Vec<M>> {
        let column = filter.column();
        if !M::has_column(column) {
            return Err(DomainError::Validation(format!(
                "{} has no column '{column}'",
                M::NAME
            )));
        }

        let predicate = match &filter {
            Filter::Eq(_, ColumnValue::Null) => format!("{column} IS NULL"),
            Filter::Eq(..) => format!("{column} = ?"),
            Filter::EqIgnoreCase(..) => format!("{column} = ? COLLATE NOCASE"),
        };
        let sql = format!("{} WHERE {predicate} ORDER BY id", select_sql::<M>());

        let query = sqlx::query_as::<_, M>(&sql);
        let query = match filter {
            Filter::Eq(_, ColumnValue::Null) => query,
            Filter::Eq(_, value) => bind_column!(query, value),
            Filter::EqIgnoreCase(_, text) => query.bind(text),
        };

        query
            .fetch_all(self.context.pool())
            .await
            .map_err(map_sqlx)
    }

    pub fn insert<M: Model>(&mut self, model: &M) -> PendingKey {
        self.tracker.added(model)
    }

    /// Inserts `model` in the same commit as `parent`, with `column` set to
    /// the id the parent is assigned.
    pub fn insert_referencing<M: Model>(
        &mut self,
        model: &M,
        column: &'static str,
        parent: PendingKey,
    ) -> PendingKey {
        self.tracker.added_referencing(model, column, parent)
    }

    pub fn insert_range<'a, M: Model>(&mut self, models: impl IntoIterator<Item = &'a M>) {
        for model in models {
            self.tracker.added(model);
        }
    }

    pub fn update<M: Model>(&mut self, model: &M) {
        self.tracker.modified(model);
    }

    pub fn delete<M: Model>(&mut self, model: &M) {
        self.tracker.deleted::<M>(model.id());
    }

    pub fn delete_range<'a, M: Model>(&mut self, models: impl IntoIterator<Item = &'a M>) {
        for model in models {
            self.tracker.deleted::<M>(model.id());
        }
    }

    pub fn delete_by_id<M: Model>(&mut self, id: i64) {
        self.tracker.deleted::<M>(id);
    }

    pub fn has_changes(&self) -> bool {
        self.tracker.has_changes()
    }

    /// Writes every pending change in one transaction.
    ///
    /// The audit logger sees the entries before anything is written and only
    /// persists its log once all entity statements succeeded. Pending changes
    /// are cleared whether or not the commit succeeds.
    pub async fn commit(&mut self) -> DomainResult<CommitReport> {
        let mut entries = self.tracker.take();
        let mut tx = self.context.pool().begin().await.map_err(map_sqlx)?;

        match self.write(&mut *tx, &mut entries).await {
            Ok(report) => {
                tx.commit().await.map_err(map_sqlx)?;
                tracing::info!(
                    inserted = report.inserted_ids.len(),
                    updated = report.updated,
                    deleted = report.deleted,
                    "committed changes"
                );
                Ok(report)
            }
            Err(err) => {
                if let Some(logger) = self.logger.as_mut() {
                    logger.discard();
                }
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "failed to roll back transaction");
                }
                tracing::warn!(error = %err, "commit rolled back");
                Err(err)
            }
        }
    }

    async fn write(
        &mut self,
        conn: &mut SqliteConnection,
        entries: &mut [ChangeEntry],
    ) -> DomainResult<CommitReport> {
        for entry in entries.iter_mut() {
            if matches!(entry.state(), EntityState::Modified | EntityState::Deleted) {
                load_original(conn, entry).await?;
            }
        }

        if let Some(logger) = self.logger.as_mut() {
            logger.log(entries);
        }

        let mut report = CommitReport::default();
        for index in 0..entries.len() {
            if let Some((column, parent)) = entries[index].reference() {
                let parent_id = entries
                    .get(parent)
                    .filter(|parent| parent.state() == EntityState::Added)
                    .map_or(0, ChangeEntry::entity_id);
                if parent_id == 0 || !entries[index].resolve_reference(column, parent_id) {
                    return Err(DomainError::persistence(format!(
                        "{} references an entity that was not inserted before it",
                        entries[index].entity_name()
                    )));
                }
            }

            let entry = &mut entries[index];
            match entry.state() {
                EntityState::Added => {
                    let id = insert_entry(conn, entry).await?;
                    entry.set_assigned_id(id);
                    report.inserted_ids.push(id);
                }
                EntityState::Modified => {
                    update_entry(conn, entry).await?;
                    report.updated += 1;
                }
                EntityState::Deleted => {
                    delete_entry(conn, entry).await?;
                    report.deleted += 1;
                }
                EntityState::Unchanged => {}
            }
        }

        if let Some(logger) = self.logger.as_mut() {
            logger.save(conn, entries).await?;
        }

        Ok(report)
    }
}

fn missing(entry: &ChangeEntry) -> DomainError {
    DomainError::not_found(format!(
        "{} {} not found",
        entry.entity_name(),
        entry.entity_id()
    ))
}

async fn load_original(conn: &mut SqliteConnection, entry: &mut ChangeEntry) -> DomainResult<()> {
    let sql = select_by_id_sql(entry);
    let row = sqlx::query(&sql)
        .bind(entry.entity_id())
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_sqlx)?
        .ok_or_else(|| missing(entry))?;

    let original = entry.read_original(&row).map_err(map_sqlx)?;
    entry.set_original(original);
    Ok(())
}

async fn insert_entry(conn: &mut SqliteConnection, entry: &ChangeEntry) -> DomainResult<i64> {
    let Some(current) = entry.current() else {
        return Err(DomainError::persistence("added entry without values"));
    };

    let columns: Vec<&str> = current.iter().map(|(name, _)| name).collect();
    let placeholders = vec!["?"; columns.len()].join(", ");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({placeholders})",
        entry.table(),
        columns.join(", ")
    );

    let mut query = sqlx::query(&sql);
    for value in current.clone().into_values() {
        query = bind_column!(query, value);
    }

    let result = query.execute(&mut *conn).await.map_err(map_sqlx)?;
    Ok(result.last_insert_rowid())
}

async fn update_entry(conn: &mut SqliteConnection, entry: &ChangeEntry) -> DomainResult<()> {
    let Some(current) = entry.current() else {
        return Err(DomainError::persistence("modified entry without values"));
    };

    let writable = current.without(entry.insert_only());
    if writable.is_empty() {
        return Ok(());
    }

    let assignments: Vec<String> = writable
        .iter()
        .map(|(name, _)| format!("{name} = ?"))
        .collect();
    let sql = format!(
        "UPDATE {} SET {} WHERE id = ?",
        entry.table(),
        assignments.join(", ")
    );

    let mut query = sqlx::query(&sql);
    for value in writable.into_values() {
        query = bind_column!(query, value);
    }

    let result = query
        .bind(entry.entity_id())
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx)?;
    if result.rows_affected() == 0 {
        return Err(missing(entry));
    }
    Ok(())
}

async fn delete_entry(conn: &mut SqliteConnection, entry: &ChangeEntry) -> DomainResult<()> {
    let sql = format!("DELETE FROM {} WHERE id = ?", entry.table());
    let result = sqlx::query(&sql)
        .bind(entry.entity_id())
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx)?;
    if result.rows_affected() == 0 {
        return Err(missing(entry));
    }
    Ok(())
}
