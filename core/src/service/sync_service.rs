use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::model::client::Client;
use crate::model::entry::TimesheetEntry;
use crate::model::staff::Staff;
use crate::model::sync::SyncStatus;
use crate::model::user::User;
use crate::service::merge::merge;

pub const SYNC_ALL_DATA: &str = "SYNC_ALL_DATA";

/// Everything sent to the remote store on a push.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SyncPayload {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: String,
    pub timesheets: Vec<TimesheetEntry>,
    pub staff: Vec<Staff>,
    pub clients: Vec<Client>,
}

impl SyncPayload {
    pub fn new(
        timestamp: DateTime<Utc>,
        timesheets: &[TimesheetEntry],
        staff: &[Staff],
        clients: &[Client],
    ) -> Self {
        Self {
            timestamp,
            kind: SYNC_ALL_DATA.to_string(),
            timesheets: timesheets.to_vec(),
            staff: staff.to_vec(),
            clients: clients.to_vec(),
        }
    }
}

/// What the remote store hands back on a pull. Records are left loosely
/// typed; the merge engine normalizes them.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RemoteSnapshot {
    #[serde(default, alias = "entries")]
    pub timesheets: Vec<Value>,
    #[serde(default)]
    pub staff: Vec<Value>,
    #[serde(default)]
    pub clients: Vec<Value>,
}

/// The channel to the remote store. Delivery is unreliable: a push that
/// returns without error counts as sent, and a pull that fails is `None`.
#[async_trait]
pub trait SyncTransport {
    async fn push_all(&self, payload: &SyncPayload) -> Result<()>;
    async fn pull_all(&self) -> Option<RemoteSnapshot>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum PushResult {
    Sent,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PushOutcome {
    pub entries: Vec<TimesheetEntry>,
    pub result: PushResult,
    pub status: SyncStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PullResult {
    NoData,
    UpToDate,
    Added(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PullOutcome {
    pub entries: Vec<TimesheetEntry>,
    pub result: PullResult,
    pub status: SyncStatus,
}

/// Sends the whole local data set. On success every entry is flagged as
/// synced and the status is stamped; on failure nothing changes.
pub async fn push<T: SyncTransport + ?Sized>(
    transport: &T,
    entries: &[TimesheetEntry],
    staff: &[Staff],
    clients: &[Client],
    status: SyncStatus,
) -> PushOutcome {
    let now = Utc::now();
    let payload = SyncPayload::new(now, entries, staff, clients);

    match transport.push_all(&payload).await {
        Ok(()) => {
            let synced = entries
                .iter()
                .cloned()
                .map(|mut e| {
                    e.synced_to_cloud = true;
                    e
                })
                .collect();
            info!(entries = entries.len(), staff = staff.len(), clients = clients.len(), "pushed data");
            PushOutcome {
                entries: synced,
                result: PushResult::Sent,
                status: status.pushed_at(now),
            }
        }
        Err(e) => {
            warn!("push failed: {:#}", e);
            PushOutcome {
                entries: entries.to_vec(),
                result: PushResult::Failed(format!("{:#}", e)),
                status,
            }
        }
    }
}

/// Fetches remote entries and folds them into the local collection.
/// Remote staff and client lists are ignored. An empty or failed fetch
/// leaves both the entries and the status untouched.
pub async fn pull<T: SyncTransport + ?Sized>(
    transport: &T,
    local: &[TimesheetEntry],
    staff: &[Staff],
    actor: &User,
    status: SyncStatus,
) -> PullOutcome {
    let snapshot = match transport.pull_all().await {
        Some(snapshot) => snapshot,
        None => {
            warn!("pull returned no data");
            return PullOutcome {
                entries: local.to_vec(),
                result: PullResult::NoData,
                status,
            };
        }
    };

    if snapshot.timesheets.is_empty() {
        warn!("pull returned no timesheet records");
        return PullOutcome {
            entries: local.to_vec(),
            result: PullResult::NoData,
            status,
        };
    }

    let outcome = merge(local, &snapshot.timesheets, staff, actor);
    let result = match outcome.added {
        0 => PullResult::UpToDate,
        n => PullResult::Added(n),
    };
    PullOutcome {
        entries: outcome.entries,
        result,
        status: status.pulled_at(Utc::now()),
    }
}
