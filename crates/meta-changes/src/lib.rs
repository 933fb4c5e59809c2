//! # meta-changes
//!
//! Turning edits into an ordered, replayable change log.
//!
//! - [`diff`]: document-to-document structural diff, arrays atomic, two levels deep
//! - [`PendingChangeStore`]: the append-only log, replay, squash, and JSONL hand-off
//! - [`EditSession`]: validate-then-record orchestration over a base snapshot

pub mod diff;
pub mod error;
pub mod session;
pub mod store;

pub use diff::diff;
pub use error::ChangeError;
pub use session::{EditSession, ReplaceOutcome};
pub use store::PendingChangeStore;
