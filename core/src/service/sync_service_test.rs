#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::json;

    use crate::model::client::Client;
    use crate::model::entry::{EntryStatus, ShiftType, TimesheetEntry};
    use crate::model::staff::Staff;
    use crate::model::sync::SyncStatus;
    use crate::model::user::{Role, User};
    use crate::service::sync_service::{
        pull, push, PullResult, PushResult, RemoteSnapshot, SyncPayload, SyncTransport,
    };

    struct MockTransport {
        fail_push: bool,
        snapshot: Option<RemoteSnapshot>,
        pushed: Mutex<Vec<SyncPayload>>,
    }

    impl MockTransport {
        fn new(snapshot: Option<RemoteSnapshot>) -> Self {
            Self { fail_push: false, snapshot, pushed: Mutex::new(Vec::new()) }
        }

        fn failing() -> Self {
            Self { fail_push: true, ..Self::new(None) }
        }
    }

    #[async_trait]
    impl SyncTransport for MockTransport {
        async fn push_all(&self, payload: &SyncPayload) -> Result<()> {
            if self.fail_push {
                return Err(anyhow!("connection refused"));
            }
            self.pushed.lock().unwrap().push(payload.clone());
            Ok(())
        }

        async fn pull_all(&self) -> Option<RemoteSnapshot> {
            self.snapshot.clone()
        }
    }

    fn entry(id: &str) -> TimesheetEntry {
        TimesheetEntry {
            id: id.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
            staff_id: "s1".to_string(),
            staff_name: "Raj Kumar".to_string(),
            client_id: "c1".to_string(),
            client_name: "John Doe".to_string(),
            service_type: "community-access".to_string(),
            shift_type: ShiftType::Day,
            location: "Community".to_string(),
            start_time: "09:00".parse().unwrap(),
            end_time: "17:00".parse().unwrap(),
            hours: 8.0,
            km: 0.0,
            work_earnings: 520.0,
            travel_earnings: 0.0,
            total_earnings: 520.0,
            notes: String::new(),
            status: EntryStatus::Pending,
            synced_to_cloud: false,
        }
    }

    fn staff() -> Vec<Staff> {
        let mut raj = Staff::new("Raj Kumar".to_string());
        raj.id = "s1".to_string();
        vec![raj]
    }

    fn clients() -> Vec<Client> {
        vec![Client { id: "c1".to_string(), name: "John Doe".to_string() }]
    }

    #[tokio::test]
    async fn test_push_marks_everything_synced() {
        let transport = MockTransport::new(None);
        let status = SyncStatus::default().mark_dirty();
        let entries = vec![entry("e1"), entry("e2")];

        let outcome = push(&transport, &entries, &staff(), &clients(), status).await;

        assert_eq!(outcome.result, PushResult::Sent);
        assert!(outcome.entries.iter().all(|e| e.synced_to_cloud));
        assert!(!outcome.status.pending);
        assert!(outcome.status.last_push_at.is_some());

        let pushed = transport.pushed.lock().unwrap();
        assert_eq!(pushed.len(), 1);
        let body = serde_json::to_value(&pushed[0]).unwrap();
        assert_eq!(body["type"], "SYNC_ALL_DATA");
        assert_eq!(body["timesheets"].as_array().unwrap().len(), 2);
        assert_eq!(body["timesheets"][0]["staffId"], "s1");
        assert_eq!(body["clients"][0]["name"], "John Doe");
    }

    #[tokio::test]
    async fn test_push_failure_leaves_state_alone() {
        let transport = MockTransport::failing();
        let status = SyncStatus::default().mark_dirty();
        let entries = vec![entry("e1")];

        let outcome = push(&transport, &entries, &staff(), &clients(), status.clone()).await;

        assert!(matches!(outcome.result, PushResult::Failed(ref reason) if reason.contains("connection refused")));
        assert_eq!(outcome.entries, entries);
        assert_eq!(outcome.status, status);
    }

    #[tokio::test]
    async fn test_pull_without_data_returns_local_unchanged() {
        let transport = MockTransport::new(None);
        let local = vec![entry("e1")];
        let manager = User::new("m1", "Mia", Role::Manager);

        let outcome = pull(&transport, &local, &staff(), &manager, SyncStatus::default()).await;

        assert_eq!(outcome.result, PullResult::NoData);
        assert_eq!(outcome.entries, local);
        assert!(outcome.status.last_pull_at.is_none());
    }

    #[tokio::test]
    async fn test_pull_with_empty_timesheets_is_no_data() {
        let snapshot: RemoteSnapshot = serde_json::from_value(json!({
            "timesheets": [],
            "staff": [{"id": "s9", "name": "Ignored"}]
        }))
        .unwrap();
        let transport = MockTransport::new(Some(snapshot));
        let local = vec![entry("e1")];
        let manager = User::new("m1", "Mia", Role::Manager);
        let status = SyncStatus::default().mark_dirty();

        let outcome = pull(&transport, &local, &staff(), &manager, status.clone()).await;

        assert_eq!(outcome.result, PullResult::NoData);
        assert_eq!(outcome.entries, local);
        assert_eq!(outcome.status, status);

        let empty = MockTransport::new(Some(RemoteSnapshot::default()));
        let outcome = pull(&empty, &local, &staff(), &manager, SyncStatus::default()).await;
        assert_eq!(outcome.result, PullResult::NoData);
        assert!(outcome.status.last_pull_at.is_none());
    }

    #[tokio::test]
    async fn test_pull_merges_new_records_only() {
        let snapshot: RemoteSnapshot = serde_json::from_value(json!({
            "entries": [
                {"id": "e1", "staffId": "s1", "date": "2024-06-05", "hours": 1},
                {"ID": "r2", "StaffID": "s1", "Date": "2024-06-06", "Hours": 4, "WorkEarnings": 260}
            ],
            "staff": [{"id": "s9", "name": "Ignored"}]
        }))
        .unwrap();
        let transport = MockTransport::new(Some(snapshot));
        let local = vec![entry("e1")];
        let manager = User::new("m1", "Mia", Role::Manager);

        let first = pull(&transport, &local, &staff(), &manager, SyncStatus::default()).await;
        assert_eq!(first.result, PullResult::Added(1));
        assert_eq!(first.entries.len(), 2);
        assert_eq!(first.entries[0], local[0]);
        assert_eq!(first.entries[1].id, "r2");
        assert_eq!(first.entries[1].total_earnings, 260.0);
        assert!(first.status.last_pull_at.is_some());

        let second = pull(&transport, &first.entries, &staff(), &manager, first.status.clone()).await;
        assert_eq!(second.result, PullResult::UpToDate);
        assert_eq!(second.entries, first.entries);
    }
}
