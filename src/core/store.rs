use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::{JournalEntry, JournalLine, ValidationError, validate};

/// Candidate entry arriving at the write boundary, before an identity and
/// sequence number have been assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    pub date: NaiveDate,
    pub description: String,
    pub exercise_id: Option<Uuid>,
    pub lines: Vec<JournalLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The candidate entry failed double-entry validation; nothing was stored.
    Validation(ValidationError),
    /// No entry with this id exists for the owner.
    NotFound(Uuid),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Validation(e) => write!(f, "validation failed: {e}"),
            StoreError::NotFound(id) => write!(f, "no entry with id {id}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Validation(e) => Some(e),
            StoreError::NotFound(_) => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(e: ValidationError) -> Self {
        StoreError::Validation(e)
    }
}

/// In-memory journal entry store.
///
/// Entry numbers are allocated from a monotonic counter per
/// (owner, exercise-context) scope rather than by counting existing entries,
/// so deleting an entry never causes a number to be reused. Numbering stays
/// sequential per scope, starting at 1.
#[derive(Debug, Default)]
pub struct JournalStore {
    entries: Vec<JournalEntry>,
    counters: HashMap<(String, Option<Uuid>), u32>,
}

impl JournalStore {
    /// Rebuilds a store from previously persisted entries. Counters resume
    /// from the highest number seen per scope.
    pub fn from_entries(entries: Vec<JournalEntry>) -> Self {
        let mut counters: HashMap<(String, Option<Uuid>), u32> = HashMap::new();
        for entry in &entries {
            let scope = (entry.owner.clone(), entry.exercise_id);
            let counter = counters.entry(scope).or_insert(0);
            *counter = (*counter).max(entry.number);
        }
        Self { entries, counters }
    }

    /// Validates and persists a candidate entry, assigning its identity and
    /// sequence number. Rejected entries never reach the store.
    pub fn create(&mut self, owner: &str, new: NewEntry) -> Result<&JournalEntry, StoreError> {
        validate(&new.lines)?;

        let scope = (owner.to_string(), new.exercise_id);
        let counter = self.counters.entry(scope).or_insert(0);
        *counter += 1;

        let entry = JournalEntry {
            id: Uuid::new_v4(),
            number: *counter,
            date: new.date,
            description: new.description,
            owner: owner.to_string(),
            exercise_id: new.exercise_id,
            lines: new.lines,
        };
        debug!(owner, entry = %entry.id, number = entry.number, "Entry persisted");
        self.entries.push(entry);
        Ok(self.entries.last().expect("entry just pushed"))
    }

    /// Removes an owner's entry by id, returning it.
    pub fn remove(&mut self, owner: &str, id: Uuid) -> Result<JournalEntry, StoreError> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.id == id && e.owner == owner)
            .ok_or(StoreError::NotFound(id))?;
        debug!(owner, entry = %id, "Entry removed");
        Ok(self.entries.remove(idx))
    }

    /// Looks up an owner's entry by id.
    pub fn get(&self, owner: &str, id: Uuid) -> Result<&JournalEntry, StoreError> {
        self.entries
            .iter()
            .find(|e| e.id == id && e.owner == owner)
            .ok_or(StoreError::NotFound(id))
    }

    /// All entries for one owner, ordered by entry number. When
    /// `exercise_filter` is set, only entries from that exercise context are
    /// returned; general-journal entries carry no exercise id and are scoped
    /// with `None`.
    pub fn entries_for(&self, owner: &str, exercise_filter: Option<Uuid>) -> Vec<&JournalEntry> {
        let mut entries: Vec<&JournalEntry> = self
            .entries
            .iter()
            .filter(|e| e.owner == owner)
            .filter(|e| exercise_filter.is_none() || e.exercise_id == exercise_filter)
            .collect();
        entries.sort_by_key(|e| e.number);
        entries
    }

    /// Iterator over every stored entry, for persistence.
    pub fn entries(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter()
    }
}
