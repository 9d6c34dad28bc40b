use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where the local copy stands relative to the remote store.
///
/// Owned by the caller and threaded through the sync calls; nothing in the
/// core keeps its own copy.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub last_push_at: Option<DateTime<Utc>>,
    pub last_pull_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pending: bool,
}

impl SyncStatus {
    pub fn mark_dirty(mut self) -> Self {
        self.pending = true;
        self
    }

    pub fn pushed_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_push_at = Some(at);
        self.pending = false;
        self
    }

    pub fn pulled_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_pull_at = Some(at);
        self
    }
}
