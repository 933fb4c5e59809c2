//! Ordered log of accepted, not yet committed changes.
//!
//! The store does no validation. Callers append only changes that passed
//! path validation; the store replays them in order on demand and hands the
//! log to the archive relay as JSONL.

use std::collections::HashMap;
use std::path::Path;

use meta_core::document::{with_value, without_value};
use meta_core::{CoreError, PendingChange};
use serde_json::Value;

use crate::error::ChangeError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingChangeStore {
    log: Vec<PendingChange>,
}

impl PendingChangeStore {
    #[must_use]
    pub const fn new() -> Self {
        Self { log: Vec::new() }
    }

    pub fn append(&mut self, change: PendingChange) {
        tracing::debug!(path = %change.path, removal = change.is_removal(), "change appended");
        self.log.push(change);
    }

    #[must_use]
    pub fn list(&self) -> &[PendingChange] {
        &self.log
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.log.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    pub fn clear(&mut self) {
        self.log.clear();
    }

    /// Remove and return the most recent change.
    pub fn pop(&mut self) -> Option<PendingChange> {
        self.log.pop()
    }

    /// Replay the log over `base` and return the result. `base` is not touched.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPath`] if a logged path does not parse, or
    /// [`CoreError::IndexOutOfRange`] if a write addresses an index past the
    /// end of its sequence. Both only happen for logs read from outside the
    /// process.
    pub fn apply_to(&self, base: &Value) -> Result<Value, CoreError> {
        self.log.iter().try_fold(base.clone(), |doc, change| {
            let path = change.doc_path()?;
            match &change.new_value {
                Some(value) => with_value(&doc, path.steps(), value.clone()),
                None => Ok(without_value(&doc, path.steps())),
            }
        })
    }

    /// Collapse repeated writes to the same path into one entry.
    ///
    /// The surviving entry sits at the position of the last write in a run,
    /// carries the last new value and the first old value. A removal ends the
    /// run for its path and is kept as is: the writes before it may have
    /// created the parent the removal leaves behind. Paths that step into an
    /// array by index are left alone, because an index removal shifts later
    /// elements.
    #[must_use]
    pub fn squash(&self) -> Self {
        let mut runs: HashMap<&str, usize> = HashMap::new();
        let mut first_old: HashMap<(&str, usize), Option<Value>> = HashMap::new();
        let mut last_write: HashMap<(&str, usize), usize> = HashMap::new();
        let mut run_of: Vec<Option<(&str, usize)>> = Vec::with_capacity(self.log.len());

        for (position, change) in self.log.iter().enumerate() {
            let path = change.path.as_str();
            if !squashable(change) {
                run_of.push(None);
                continue;
            }
            if change.is_removal() {
                *runs.entry(path).or_default() += 1;
                run_of.push(None);
                continue;
            }
            let run = (path, runs.get(path).copied().unwrap_or_default());
            first_old
                .entry(run)
                .or_insert_with(|| change.old_value.clone());
            last_write.insert(run, position);
            run_of.push(Some(run));
        }

        let log = self
            .log
            .iter()
            .zip(&run_of)
            .enumerate()
            .filter_map(|(position, (change, run))| match run {
                None => Some(change.clone()),
                Some(run) if last_write.get(run) == Some(&position) => Some(PendingChange {
                    old_value: first_old
                        .get(run)
                        .cloned()
                        .unwrap_or_else(|| change.old_value.clone()),
                    ..change.clone()
                }),
                Some(_) => None,
            })
            .collect::<Vec<_>>();

        tracing::debug!(before = self.log.len(), after = log.len(), "change log squashed");
        Self { log }
    }

    /// Write the whole log to `path`, one change per line, replacing the file.
    ///
    /// # Errors
    ///
    /// Returns [`ChangeError::Jsonl`] if the file cannot be written.
    pub fn write_jsonl(&self, path: &Path) -> Result<(), ChangeError> {
        serde_jsonlines::write_json_lines(path, &self.log).map_err(|source| ChangeError::Jsonl {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Append a single change to the JSONL file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ChangeError::Jsonl`] if the file cannot be written.
    pub fn append_jsonl(path: &Path, change: &PendingChange) -> Result<(), ChangeError> {
        serde_jsonlines::append_json_lines(path, [change]).map_err(|source| ChangeError::Jsonl {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a log previously written with [`Self::write_jsonl`].
    ///
    /// # Errors
    ///
    /// Returns [`ChangeError::Jsonl`] if the file cannot be read or a line is
    /// not a change record.
    pub fn read_jsonl(path: &Path) -> Result<Self, ChangeError> {
        let to_error = |source| ChangeError::Jsonl {
            path: path.to_path_buf(),
            source,
        };
        let log = serde_jsonlines::json_lines(path)
            .map_err(to_error)?
            .collect::<Result<Vec<PendingChange>, _>>()
            .map_err(to_error)?;
        Ok(Self { log })
    }
}

impl FromIterator<PendingChange> for PendingChangeStore {
    fn from_iter<I: IntoIterator<Item = PendingChange>>(iter: I) -> Self {
        Self {
            log: iter.into_iter().collect(),
        }
    }
}

impl Extend<PendingChange> for PendingChangeStore {
    fn extend<I: IntoIterator<Item = PendingChange>>(&mut self, iter: I) {
        for change in iter {
            self.append(change);
        }
    }
}

fn squashable(change: &PendingChange) -> bool {
    change
        .doc_path()
        .is_ok_and(|path| !path.steps().iter().any(meta_core::PathStep::is_index))
}
