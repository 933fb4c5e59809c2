//! Edit session: a base snapshot, a schema version, and the pending log.
//!
//! Every proposed edit is validated against the working document (base with
//! the log replayed) and appended only if accepted. Edits accepted while the
//! schema was still loading are remembered until [`EditSession::revalidate`]
//! checks them. `commit` hands back the merged document for the relay and
//! starts a fresh log on top of it.

use std::sync::Arc;

use meta_core::document::get_in;
use meta_core::{DocPath, PendingChange, ValidationResult};
use meta_schema::{ChangeCheck, SchemaSource, ValidationEngine};
use serde_json::Value;

use crate::diff::diff;
use crate::error::ChangeError;
use crate::store::PendingChangeStore;

/// Outcome of replacing the whole working document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// Every change was accepted and appended; holds how many.
    Applied(usize),
    /// At least one change was rejected and nothing was appended. Holds each
    /// rejected change with its result.
    Rejected(Vec<(PendingChange, ValidationResult)>),
}

impl ReplaceOutcome {
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

pub struct EditSession<S> {
    engine: Arc<ValidationEngine<S>>,
    version: Option<String>,
    base: Value,
    store: PendingChangeStore,
    /// Log positions of changes accepted without a schema, ascending.
    unvalidated: Vec<usize>,
}

impl<S: SchemaSource> EditSession<S> {
    #[must_use]
    pub const fn new(engine: Arc<ValidationEngine<S>>, version: Option<String>, base: Value) -> Self {
        Self {
            engine,
            version,
            base,
            store: PendingChangeStore::new(),
            unvalidated: Vec::new(),
        }
    }

    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    #[must_use]
    pub const fn base(&self) -> &Value {
        &self.base
    }

    #[must_use]
    pub const fn changes(&self) -> &PendingChangeStore {
        &self.store
    }

    /// Base document with all pending changes applied.
    ///
    /// # Errors
    ///
    /// Returns [`ChangeError::Path`] if a logged path does not parse.
    pub fn working(&self) -> Result<Value, ChangeError> {
        Ok(self.store.apply_to(&self.base)?)
    }

    /// Validate setting `path` to `value`, fetching the schema if needed, and
    /// record the change if accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ChangeError::Path`] for a malformed path and
    /// [`ChangeError::Schema`] when the schema cannot be obtained. A rejected
    /// edit is returned as a failing result, not an error.
    pub async fn propose(&mut self, path: &str, value: Value) -> Result<ValidationResult, ChangeError> {
        let path = DocPath::parse(path)?;
        let working = self.working()?;
        let result = self
            .engine
            .validate_change(self.version.as_deref(), &path, &value, &working)
            .await?;
        if result.is_valid() {
            self.record(&path, &working, value);
        } else {
            tracing::debug!(%path, errors = result.errors().len(), "change rejected");
        }
        Ok(result)
    }

    /// Like [`Self::propose`], but only consults the schema cache.
    ///
    /// With no cached schema the edit is recorded as
    /// [`ChangeCheck::Unvalidated`] and counted by [`Self::unvalidated`] until
    /// [`Self::revalidate`] runs.
    ///
    /// # Errors
    ///
    /// Returns [`ChangeError::Path`] for a malformed path.
    pub fn propose_now(&mut self, path: &str, value: Value) -> Result<ChangeCheck, ChangeError> {
        let path = DocPath::parse(path)?;
        let working = self.working()?;
        let check = self
            .engine
            .validate_change_now(self.version.as_deref(), &path, &value, &working);
        match &check {
            ChangeCheck::Unvalidated => {
                self.unvalidated.push(self.store.len());
                self.record(&path, &working, value);
            }
            ChangeCheck::Checked(result) if result.is_valid() => self.record(&path, &working, value),
            ChangeCheck::Checked(result) => {
                tracing::debug!(%path, errors = result.errors().len(), "change rejected");
            }
        }
        Ok(check)
    }

    /// Number of pending changes accepted before their schema was available.
    #[must_use]
    pub fn unvalidated(&self) -> usize {
        self.unvalidated.len()
    }

    /// Validate the changes accepted while the schema was loading, fetching it
    /// if needed.
    ///
    /// Each change is checked against the document as it stood when the
    /// change was made. Failing changes are returned with their results and
    /// stay in the log; the caller decides whether to undo them. Afterwards no
    /// change counts as unvalidated.
    ///
    /// # Errors
    ///
    /// Returns [`ChangeError::Schema`] when the schema cannot be obtained and
    /// [`ChangeError::Path`] if the log does not replay. Nothing changes on error.
    pub async fn revalidate(&mut self) -> Result<Vec<(PendingChange, ValidationResult)>, ChangeError> {
        let mut failures = Vec::new();
        for &position in &self.unvalidated {
            let log = self.store.list();
            let (Some(change), Some(before)) = (log.get(position), log.get(..position)) else {
                continue;
            };
            let Some(value) = &change.new_value else {
                continue;
            };
            let working = before.iter().cloned().collect::<PendingChangeStore>().apply_to(&self.base)?;
            let result = self
                .engine
                .validate_change(self.version.as_deref(), &change.doc_path()?, value, &working)
                .await?;
            if !result.is_valid() {
                failures.push((change.clone(), result));
            }
        }

        tracing::debug!(
            checked = self.unvalidated.len(),
            failed = failures.len(),
            "revalidated changes accepted without schema"
        );
        self.unvalidated.clear();
        Ok(failures)
    }

    /// Replace the working document wholesale.
    ///
    /// The difference to the current working document is validated entry by
    /// entry; removals are accepted without validation. Either all entries are
    /// appended or none are.
    ///
    /// # Errors
    ///
    /// Returns [`ChangeError::Schema`] when the schema cannot be obtained and
    /// [`ChangeError::Path`] when a changed top-level key cannot be addressed.
    pub async fn replace_document(&mut self, document: &Value) -> Result<ReplaceOutcome, ChangeError> {
        let working = self.working()?;
        let changes = diff(&working, document)?;

        let mut rejected = Vec::new();
        for change in &changes {
            let Some(new_value) = &change.new_value else {
                continue;
            };
            let path = change.doc_path()?;
            let result = self
                .engine
                .validate_change(self.version.as_deref(), &path, new_value, &working)
                .await?;
            if !result.is_valid() {
                rejected.push((change.clone(), result));
            }
        }

        if !rejected.is_empty() {
            tracing::info!(rejected = rejected.len(), total = changes.len(), "document replacement rejected");
            return Ok(ReplaceOutcome::Rejected(rejected));
        }

        let applied = changes.len();
        self.store.extend(changes);
        Ok(ReplaceOutcome::Applied(applied))
    }

    /// Drop the most recent pending change.
    pub fn undo(&mut self) -> Option<PendingChange> {
        let change = self.store.pop()?;
        if self.unvalidated.last() == Some(&self.store.len()) {
            self.unvalidated.pop();
        }
        Some(change)
    }

    /// Drop every pending change.
    pub fn reset(&mut self) {
        self.store.clear();
        self.unvalidated.clear();
    }

    /// Swap in a new base (e.g. after the remote document moved). Pending
    /// changes are kept and will replay over the new base.
    pub fn reload(&mut self, base: Value) {
        self.base = base;
    }

    /// Merge the log into the base and start over from the merged document.
    ///
    /// On error nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`ChangeError::Path`] if a logged path does not parse.
    pub fn commit(&mut self) -> Result<Value, ChangeError> {
        let merged = self.working()?;
        tracing::info!(
            changes = self.store.len(),
            unvalidated = self.unvalidated.len(),
            "committing pending changes"
        );
        self.base = merged.clone();
        self.store.clear();
        self.unvalidated.clear();
        Ok(merged)
    }

    fn record(&mut self, path: &DocPath, working: &Value, value: Value) {
        let old_value = get_in(working, path.steps()).cloned();
        self.store
            .append(PendingChange::new(path.to_string(), old_value, Some(value)));
    }
}
