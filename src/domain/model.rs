// src/domain/model.rs
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, sqlite::SqliteRow};

/// A single column value as it is written to, and audited from, the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl From<bool> for ColumnValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ColumnValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for ColumnValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<String> for ColumnValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ColumnValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<DateTime<Utc>> for ColumnValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl<T: Into<ColumnValue>> From<Option<T>> for ColumnValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Ordered column/value pairs of one entity, excluding its id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot(Vec<(&'static str, ColumnValue)>);

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &'static str, value: impl Into<ColumnValue>) -> Self {
        self.0.push((column, value.into()));
        self
    }

    pub fn get(&self, column: &str) -> Option<&ColumnValue> {
        self.0
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }

    /// Replaces the value of a column already in the snapshot.
    pub fn set(&mut self, column: &str, value: impl Into<ColumnValue>) -> bool {
        match self.0.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ColumnValue)> {
        self.0.iter().map(|(name, value)| (*name, value))
    }

    /// Copy of the snapshot without the given columns.
    pub fn without(&self, columns: &[&str]) -> Self {
        Self(
            self.0
                .iter()
                .filter(|(name, _)| !columns.contains(name))
                .cloned()
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_values(self) -> impl Iterator<Item = ColumnValue> {
        self.0.into_iter().map(|(_, value)| value)
    }
}

/// A persisted entity the unit of work can read, track and write.
///
/// `COLUMNS` lists the stored columns besides `id` in the same order
/// `snapshot` returns them. Rows are read with `SELECT id, <COLUMNS>`.
pub trait Model: Clone + Send + Sync + Unpin + for<'r> FromRow<'r, SqliteRow> + 'static {
    const NAME: &'static str;
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
    /// Columns written on insert and never touched by an update.
    const INSERT_ONLY: &'static [&'static str] = &["creation_date"];

    /// Zero until the entity has been inserted.
    fn id(&self) -> i64;

    fn snapshot(&self) -> Snapshot;

    fn has_column(column: &str) -> bool {
        column == "id" || Self::COLUMNS.contains(&column)
    }
}
