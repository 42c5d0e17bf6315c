use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info};
use uuid::Uuid;

use crate::core::{
    JournalStore, LedgerAccount, NewEntry, StoreError, aggregate, reduce,
};

use super::{LedgerAccountView, TrialBalanceView, ledger_views};

/// Lifecycle of one owner's work on an exercise. The student submits, the
/// teacher reviews; any other transition is invalid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    InProgress,
    Submitted,
    Reviewed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Student,
    Teacher,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    Store(StoreError),
    /// The exercise has been submitted; its entries are read-only.
    Locked,
    /// The submission state machine does not allow this transition.
    InvalidTransition,
    /// The caller's role does not allow this operation.
    Unauthorized,
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Store(e) => write!(f, "store error: {e}"),
            ServiceError::Locked => write!(f, "exercise has been submitted and is read-only"),
            ServiceError::InvalidTransition => write!(f, "submission status does not allow this"),
            ServiceError::Unauthorized => write!(f, "role does not allow this operation"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        ServiceError::Store(e)
    }
}

/// Write/read boundary over the journal store.
///
/// Entry creation and deletion are refused once the surrounding exercise is
/// submitted; general-journal entries (no exercise context) are never locked.
/// Ledger and trial-balance views are recomputed from the stored entries on
/// every call.
#[derive(Debug, Default)]
pub struct JournalService {
    store: JournalStore,
    submissions: HashMap<(String, Uuid), SubmissionStatus>,
}

impl JournalService {
    pub fn new(store: JournalStore) -> Self {
        Self {
            store,
            submissions: HashMap::new(),
        }
    }

    pub fn store(&self) -> &JournalStore {
        &self.store
    }

    fn status(&self, owner: &str, exercise: Uuid) -> SubmissionStatus {
        self.submissions
            .get(&(owner.to_string(), exercise))
            .copied()
            .unwrap_or_default()
    }

    fn check_writable(&self, owner: &str, exercise: Option<Uuid>) -> Result<(), ServiceError> {
        match exercise {
            Some(id) if self.status(owner, id) != SubmissionStatus::InProgress => {
                Err(ServiceError::Locked)
            }
            _ => Ok(()),
        }
    }

    /// Validates and persists a candidate entry, returning its assigned id.
    pub fn post_entry(&mut self, owner: &str, new: NewEntry) -> Result<Uuid, ServiceError> {
        self.check_writable(owner, new.exercise_id)?;
        let entry = self.store.create(owner, new)?;
        info!(owner, entry = %entry.id, number = entry.number, "Journal entry posted");
        Ok(entry.id)
    }

    /// Deletes an owner's entry, refusing once its exercise is submitted.
    pub fn delete_entry(&mut self, owner: &str, id: Uuid) -> Result<(), ServiceError> {
        let exercise = self.store.get(owner, id)?.exercise_id;
        self.check_writable(owner, exercise)?;
        self.store.remove(owner, id)?;
        info!(owner, entry = %id, "Journal entry deleted");
        Ok(())
    }

    /// Student hands in an exercise; its entries become read-only.
    pub fn submit(&mut self, role: Role, owner: &str, exercise: Uuid) -> Result<(), ServiceError> {
        if role != Role::Student {
            return Err(ServiceError::Unauthorized);
        }
        if self.status(owner, exercise) != SubmissionStatus::InProgress {
            return Err(ServiceError::InvalidTransition);
        }
        self.submissions
            .insert((owner.to_string(), exercise), SubmissionStatus::Submitted);
        info!(owner, %exercise, "Exercise submitted");
        Ok(())
    }

    /// Teacher marks a submitted exercise as reviewed.
    pub fn review(&mut self, role: Role, owner: &str, exercise: Uuid) -> Result<(), ServiceError> {
        if role != Role::Teacher {
            return Err(ServiceError::Unauthorized);
        }
        if self.status(owner, exercise) != SubmissionStatus::Submitted {
            return Err(ServiceError::InvalidTransition);
        }
        self.submissions
            .insert((owner.to_string(), exercise), SubmissionStatus::Reviewed);
        info!(owner, %exercise, "Exercise reviewed");
        Ok(())
    }

    pub fn submission_status(&self, owner: &str, exercise: Uuid) -> SubmissionStatus {
        self.status(owner, exercise)
    }

    fn aggregated(&self, owner: &str, exercise: Option<Uuid>) -> BTreeMap<String, LedgerAccount> {
        let entries: Vec<_> = self
            .store
            .entries_for(owner, exercise)
            .into_iter()
            .cloned()
            .collect();
        debug!(owner, entries = entries.len(), "Deriving ledger");
        aggregate(&entries)
    }

    /// Per-account ledger for one owner, optionally scoped to an exercise.
    pub fn ledger(&self, owner: &str, exercise: Option<Uuid>) -> Vec<LedgerAccountView> {
        ledger_views(&self.aggregated(owner, exercise))
    }

    /// Trial balance for one owner, optionally scoped to an exercise.
    pub fn trial_balance(&self, owner: &str, exercise: Option<Uuid>) -> TrialBalanceView {
        TrialBalanceView::from(&reduce(&self.aggregated(owner, exercise)))
    }
}
