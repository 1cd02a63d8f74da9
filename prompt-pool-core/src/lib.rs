//! Prompt Pool Core - Record and View Types
//!
//! Pure data structures shared by the client crates. Records are always
//! handled as whole-list snapshots; nothing here patches a list in place.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod view;

pub use view::{
    ComposeEdit, DisplayOption, DisplayOptions, Draft, DraftField, FilterEdit, InputMode,
    Movement, ViewState,
};

// ============================================================================
// RECORDS
// ============================================================================

/// Server-assigned record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl RecordId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// One prompt in the shared list.
///
/// A record is immutable once created; an edit on the service side shows up
/// here as a different record in the next snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub title: String,
    pub description: String,
}

impl Record {
    pub fn new(id: impl Into<RecordId>, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Body of a create call. The id is assigned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    pub title: String,
    pub description: String,
}

impl NewRecord {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Ordered snapshot of every record. Always replaced as a whole.
pub type RecordList = Vec<Record>;
