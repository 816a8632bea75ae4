use crate::domain::{
    audit::{AuditAction, PropertyChange},
    model::{ColumnValue, Model, Snapshot},
};
use sqlx::sqlite::SqliteRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    Added,
    Modified,
    Deleted,
    Unchanged,
}

impl EntityState {
    pub fn audit_action(self) -> Option<AuditAction> {
        match self {
            EntityState::Added => Some(AuditAction::Created),
            EntityState::Modified => Some(AuditAction::Edited),
            EntityState::Deleted => Some(AuditAction::Deleted),
            EntityState::Unchanged => None,
        }
    }
}

/// Handle on an entity added to the same unit of work, whose id is only
/// known once the commit has inserted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingKey(usize);

type SnapshotReader = fn(&SqliteRow) -> Result<Snapshot, sqlx::Error>;

fn read_snapshot<M: Model>(row: &SqliteRow) -> Result<Snapshot, sqlx::Error> {
    Ok(M::from_row(row)?.snapshot())
}

/// One pending change, with enough of the model's shape to write it
/// without knowing its type.
#[derive(Debug, Clone)]
pub struct ChangeEntry {
    entity_name: &'static str,
    table: &'static str,
    columns: &'static [&'static str],
    insert_only: &'static [&'static str],
    id: i64,
    state: EntityState,
    original: Option<Snapshot>,
    current: Option<Snapshot>,
    /// Column filled with the id of another added entry before insert.
    reference: Option<(&'static str, PendingKey)>,
    reader: SnapshotReader,
}

impl ChangeEntry {
    fn for_model<M: Model>(id: i64, state: EntityState, current: Option<Snapshot>) -> Self {
        Self {
            entity_name: M::NAME,
            table: M::TABLE,
            columns: M::COLUMNS,
            insert_only: M::INSERT_ONLY,
            id,
            state,
            original: None,
            current,
            reference: None,
            reader: read_snapshot::<M>,
        }
    }

    pub fn entity_name(&self) -> &'static str {
        self.entity_name
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn columns(&self) -> &'static [&'static str] {
        self.columns
    }

    pub fn insert_only(&self) -> &'static [&'static str] {
        self.insert_only
    }

    /// Zero for added entries until the commit assigns one.
    pub fn entity_id(&self) -> i64 {
        self.id
    }

    pub fn state(&self) -> EntityState {
        self.state
    }

    pub fn original(&self) -> Option<&Snapshot> {
        self.original.as_ref()
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.current.as_ref()
    }

    pub(crate) fn read_original(&self, row: &SqliteRow) -> Result<Snapshot, sqlx::Error> {
        (self.reader)(row)
    }

    /// Records the stored values; a modification that changes nothing
    /// becomes unchanged.
    pub(crate) fn set_original(&mut self, original: Snapshot) {
        if self.state == EntityState::Modified {
            if let Some(current) = &self.current {
                let stored = original.without(self.insert_only);
                if current.without(self.insert_only) == stored {
                    self.state = EntityState::Unchanged;
                }
            }
        }
        self.original = Some(original);
    }

    pub(crate) fn set_assigned_id(&mut self, id: i64) {
        self.id = id;
    }

    pub(crate) fn reference(&self) -> Option<(&'static str, usize)> {
        self.reference.map(|(column, key)| (column, key.0))
    }

    /// Writes the referenced entity's id into the pending values.
    pub(crate) fn resolve_reference(&mut self, column: &str, id: i64) -> bool {
        self.current
            .as_mut()
            .is_some_and(|current| current.set(column, id))
    }

    /// Properties this entry writes, with their before/after values.
    pub fn property_changes(&self) -> Vec<PropertyChange> {
        match self.state {
            EntityState::Added => self
                .current
                .iter()
                .flat_map(Snapshot::iter)
                .map(|(name, value)| change(name, ColumnValue::Null, value.clone()))
                .collect(),
            EntityState::Deleted => self
                .original
                .iter()
                .flat_map(Snapshot::iter)
                .map(|(name, value)| change(name, value.clone(), ColumnValue::Null))
                .collect(),
            EntityState::Modified => {
                let Some(current) = &self.current else {
                    return Vec::new();
                };
                current
                    .iter()
                    .filter(|(name, _)| !self.insert_only.contains(name))
                    .filter_map(|(name, after)| {
                        let before = self
                            .original
                            .as_ref()
                            .and_then(|original| original.get(name))
                            .cloned()
                            .unwrap_or(ColumnValue::Null);
                        (before != *after).then(|| change(name, before, after.clone()))
                    })
                    .collect()
            }
            EntityState::Unchanged => Vec::new(),
        }
    }
}

fn change(property: &str, before: ColumnValue, after: ColumnValue) -> PropertyChange {
    PropertyChange {
        property: property.to_string(),
        before,
        after,
    }
}

/// Explicit replacement for implicit ORM change tracking: callers state what
/// they want added, modified or deleted and the unit of work diffs it against
/// the stored rows at commit time.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    entries: Vec<ChangeEntry>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn added<M: Model>(&mut self, model: &M) -> PendingKey {
        self.entries.push(ChangeEntry::for_model::<M>(
            0,
            EntityState::Added,
            Some(model.snapshot()),
        ));
        PendingKey(self.entries.len() - 1)
    }

    /// Adds `model` with `column` set to the id `parent` receives on insert.
    pub fn added_referencing<M: Model>(
        &mut self,
        model: &M,
        column: &'static str,
        parent: PendingKey,
    ) -> PendingKey {
        let key = self.added(model);
        self.entries[key.0].reference = Some((column, parent));
        key
    }

    /// Marks `model` modified. A pending delete of the same entity is turned
    /// back into a modification carrying the new values.
    pub fn modified<M: Model>(&mut self, model: &M) {
        let snapshot = model.snapshot();
        if let Some(entry) = self.find_mut::<M>(model.id()) {
            if matches!(entry.state, EntityState::Modified | EntityState::Deleted) {
                entry.state = EntityState::Modified;
                entry.current = Some(snapshot);
                return;
            }
        }
        self.entries.push(ChangeEntry::for_model::<M>(
            model.id(),
            EntityState::Modified,
            Some(snapshot),
        ));
    }

    pub fn deleted<M: Model>(&mut self, id: i64) {
        if let Some(entry) = self.find_mut::<M>(id) {
            entry.state = EntityState::Deleted;
            entry.current = None;
            return;
        }
        self.entries
            .push(ChangeEntry::for_model::<M>(id, EntityState::Deleted, None));
    }

    fn find_mut<M: Model>(&mut self, id: i64) -> Option<&mut ChangeEntry> {
        if id == 0 {
            return None;
        }
        self.entries
            .iter_mut()
            .find(|entry| entry.table == M::TABLE && entry.id == id)
    }

    pub fn entries(&self) -> &[ChangeEntry] {
        &self.entries
    }

    pub fn has_changes(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn take(&mut self) -> Vec<ChangeEntry> {
        std::mem::take(&mut self.entries)
    }
}
