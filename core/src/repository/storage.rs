use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::model::client::{is_numeric_name, Client};
use crate::model::entry::TimesheetEntry;
use crate::model::rate_card::RateCard;
use crate::model::staff::{Staff, DEFAULT_STAFF_ROLE};
use crate::model::sync::SyncStatus;
use crate::repository::traits::KeyValueStore;
use crate::service::merge::normalize_stored;

pub const STAFF_KEY: &str = "timesheet_staff_v3";
pub const CLIENTS_KEY: &str = "timesheet_clients_v3";
pub const ENTRIES_KEY: &str = "timesheet_entries_v3";
pub const THEME_KEY: &str = "timesheet_theme_v3";
pub const SYNC_KEY: &str = "timesheet_sync_v3";

const UNKNOWN_CLIENT: &str = "Unknown Client";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        })
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_matches('"').to_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(anyhow!("Unknown theme: '{}'", s)),
        }
    }
}

/// Typed access to the four data namespaces (plus sync bookkeeping).
///
/// Older data shapes are adapted here on the way in: staff without a rate
/// card get the defaults, out-of-range rates are reset, and client records
/// are stripped back to id and name. Staff and entry records that no longer
/// deserialize are adapted field by field and kept; a record that is not
/// even an object fails the load.
pub struct Storage<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Storage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn read_records(&self, key: &str) -> Result<Vec<Value>> {
        match self.store.get(key)? {
            None => Ok(Vec::new()),
            Some(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            Some(raw) => {
                let value: Value = serde_json::from_str(&raw)
                    .with_context(|| format!("Stored value for '{}' is not valid JSON", key))?;
                match value {
                    Value::Array(items) => Ok(items),
                    _ => Err(anyhow!("Stored value for '{}' is not a list", key)),
                }
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        self.store.set(key, &json)
    }

    pub fn load_staff(&self) -> Result<Vec<Staff>> {
        let records = self.read_records(STAFF_KEY)?;
        let mut staff = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let mut member = match Staff::deserialize(record) {
                Ok(member) => member,
                Err(e) => {
                    warn!(index, "adapting legacy staff record: {}", e);
                    migrate_staff(record).ok_or_else(|| {
                        anyhow!("Staff record {} in '{}' is not an object", index, STAFF_KEY)
                    })?
                }
            };
            if !member.rates.is_valid() {
                warn!(staff = %member.id, fields = ?member.rates.invalid_fields(), "resetting invalid rates to defaults");
                member.rates = member.rates.sanitized();
            }
            staff.push(member);
        }
        Ok(staff)
    }

    pub fn save_staff(&self, staff: &[Staff]) -> Result<()> {
        self.write(STAFF_KEY, staff)
    }

    pub fn load_clients(&self) -> Result<Vec<Client>> {
        let records = self.read_records(CLIENTS_KEY)?;
        Ok(records.iter().filter_map(migrate_client).collect())
    }

    pub fn save_clients(&self, clients: &[Client]) -> Result<()> {
        self.write(CLIENTS_KEY, clients)
    }

    /// Entries that no longer match the current shape are read the way
    /// remote records are, so a later save keeps them.
    pub fn load_entries(&self) -> Result<Vec<TimesheetEntry>> {
        let records = self.read_records(ENTRIES_KEY)?;
        let mut staff: Option<Vec<Staff>> = None;
        let mut entries = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            match TimesheetEntry::deserialize(record) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    warn!(index, "adapting legacy entry record: {}", e);
                    if staff.is_none() {
                        staff = Some(self.load_staff()?);
                    }
                    let roster = staff.as_deref().unwrap_or_default();
                    let entry = normalize_stored(record, roster).ok_or_else(|| {
                        anyhow!("Entry record {} in '{}' is not an object", index, ENTRIES_KEY)
                    })?;
                    entries.push(entry);
                }
            }
        }
        Ok(entries)
    }

    pub fn save_entries(&self, entries: &[TimesheetEntry]) -> Result<()> {
        self.write(ENTRIES_KEY, entries)
    }

    pub fn load_theme(&self) -> Result<Theme> {
        let raw = self.store.get(THEME_KEY)?;
        Ok(raw.and_then(|s| s.parse().ok()).unwrap_or_default())
    }

    pub fn save_theme(&self, theme: Theme) -> Result<()> {
        self.write(THEME_KEY, &theme.to_string())
    }

    pub fn load_sync_status(&self) -> Result<SyncStatus> {
        match self.store.get(SYNC_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("discarding unreadable sync status: {}", e);
                SyncStatus::default()
            })),
            None => Ok(SyncStatus::default()),
        }
    }

    pub fn save_sync_status(&self, status: &SyncStatus) -> Result<()> {
        self.write(SYNC_KEY, status)
    }
}

fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Clients used to carry rates; keep only id and name, and drop records
/// whose name is blank, a placeholder, or a stray number.
fn migrate_client(record: &Value) -> Option<Client> {
    let name = scalar_text(record.get("name")).unwrap_or_else(|| UNKNOWN_CLIENT.to_string());
    if name == UNKNOWN_CLIENT || is_numeric_name(&name) {
        warn!(record = %record, "dropping unusable client record");
        return None;
    }
    let id = scalar_text(record.get("id")).unwrap_or_else(|| Uuid::new_v4().to_string());
    Some(Client { id, name })
}

/// Staff written before the current shape: numeric ids, null fields, rates
/// stored as strings. Missing values take the onboarding defaults.
fn migrate_staff(record: &Value) -> Option<Staff> {
    let fields = record.as_object()?;
    let text = |key: &str| scalar_text(fields.get(key));

    let mut member = Staff::new(text("name").unwrap_or_default());
    if let Some(id) = text("id") {
        member.id = id;
    }
    member.role = text("role").unwrap_or_else(|| DEFAULT_STAFF_ROLE.to_string());
    member.email = text("email").unwrap_or_default();
    member.phone = text("phone").unwrap_or_default();
    member.start_date = text("startDate").unwrap_or_default();
    member.active = fields.get("active").and_then(Value::as_bool).unwrap_or(true);
    member.rates = fields.get("rates").map(lenient_rates).unwrap_or_default();
    Some(member)
}

fn lenient_rates(value: &Value) -> RateCard {
    let defaults = RateCard::default();
    let rate = |key: &str, fallback: f64| match value.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(fallback),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(fallback),
        _ => fallback,
    };
    RateCard {
        day: rate("day", defaults.day),
        evening: rate("evening", defaults.evening),
        night: rate("night", defaults.night),
        sleepover: rate("sleepover", defaults.sleepover),
        saturday: rate("saturday", defaults.saturday),
        sunday: rate("sunday", defaults.sunday),
        public_holiday: rate("publicHoliday", defaults.public_holiday),
        km: rate("km", defaults.km),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryStore;

    fn storage_with(key: &str, raw: &str) -> Storage<MemoryStore> {
        let store = MemoryStore::new();
        store.set(key, raw).unwrap();
        Storage::new(store)
    }

    #[test]
    fn test_empty_store_loads_defaults() {
        let storage = Storage::new(MemoryStore::new());
        assert!(storage.load_staff().unwrap().is_empty());
        assert!(storage.load_clients().unwrap().is_empty());
        assert!(storage.load_entries().unwrap().is_empty());
        assert_eq!(storage.load_theme().unwrap(), Theme::Dark);
        assert_eq!(storage.load_sync_status().unwrap(), SyncStatus::default());
    }

    #[test]
    fn test_staff_without_rates_get_defaults() {
        let storage = storage_with(
            STAFF_KEY,
            r#"[{"id": "1", "name": "Raj Kumar", "role": "team-leader", "active": true},
                {"id": "2", "name": "Ana", "rates": {"day": 70, "night": -5}}]"#,
        );
        let staff = storage.load_staff().unwrap();
        assert_eq!(staff.len(), 2);
        assert_eq!(staff[0].rates, RateCard::default());
        assert_eq!(staff[1].rates.day, 70.0);
        assert_eq!(staff[1].rates.night, RateCard::default().night);
    }

    #[test]
    fn test_legacy_clients_are_sanitized() {
        let storage = storage_with(
            CLIENTS_KEY,
            r#"[{"id": "c1", "name": "John Doe", "rates": {"day": 65}},
                {"id": "c2", "name": "65"},
                {"id": "c3", "name": ""},
                {"id": "c4"},
                {"name": "No Id"}]"#,
        );
        let clients = storage.load_clients().unwrap();
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0], Client { id: "c1".to_string(), name: "John Doe".to_string() });
        assert_eq!(clients[1].name, "No Id");
        assert!(!clients[1].id.is_empty());

        storage.save_clients(&clients).unwrap();
        let raw = storage.store.get(CLIENTS_KEY).unwrap().unwrap();
        assert!(!raw.contains("rates"));
    }

    #[test]
    fn test_legacy_entries_are_adapted_not_dropped() {
        let store = MemoryStore::new();
        store
            .set(STAFF_KEY, r#"[{"id": "s1", "name": "Raj", "rates": {"night": 85}}]"#)
            .unwrap();
        store
            .set(
                ENTRIES_KEY,
                r#"[{"id": "legacy", "date": "", "staffId": "s1", "startTime": "9am",
                     "hours": 5, "workEarnings": 0, "shiftType": "night", "syncedToCloud": true},
                    {"id": "1", "date": "2024-06-01", "staffId": "s1", "staffName": "Raj",
                     "clientId": "c1", "clientName": "John", "shiftType": "day",
                     "startTime": "09:00", "endTime": "17:00", "hours": 8, "km": 0,
                     "workEarnings": 760, "travelEarnings": 0, "totalEarnings": 760,
                     "status": "pending"}]"#,
            )
            .unwrap();
        let storage = Storage::new(store);

        let entries = storage.load_entries().unwrap();
        assert_eq!(entries.len(), 2);
        let legacy = &entries[0];
        assert_eq!(legacy.id, "legacy");
        assert_eq!(legacy.start_time.to_string(), "09:00");
        // 1970-01-01 is a weekday, so the night rate applies
        assert_eq!(legacy.work_earnings, 5.0 * 85.0);
        assert!(legacy.synced_to_cloud);
        assert_eq!(entries[1].id, "1");
    }

    #[test]
    fn test_non_object_entry_refuses_to_load() {
        let storage = storage_with(ENTRIES_KEY, r#"[42]"#);
        assert!(storage.load_entries().is_err());
    }

    #[test]
    fn test_legacy_staff_are_adapted_not_dropped() {
        let storage = storage_with(
            STAFF_KEY,
            r#"[{"id": 7, "name": "Old Timer", "role": null, "active": null,
                 "rates": {"day": "70", "km": "n/a"}}]"#,
        );
        let staff = storage.load_staff().unwrap();
        assert_eq!(staff.len(), 1);
        assert_eq!(staff[0].id, "7");
        assert_eq!(staff[0].name, "Old Timer");
        assert_eq!(staff[0].role, DEFAULT_STAFF_ROLE);
        assert!(staff[0].active);
        assert_eq!(staff[0].rates.day, 70.0);
        assert_eq!(staff[0].rates.km, RateCard::default().km);
    }

    #[test]
    fn test_corrupt_document_is_an_error() {
        let storage = storage_with(ENTRIES_KEY, "{not json");
        assert!(storage.load_entries().is_err());
    }

    #[test]
    fn test_theme_accepts_raw_and_json_strings() {
        assert_eq!(storage_with(THEME_KEY, "light").load_theme().unwrap(), Theme::Light);
        assert_eq!(storage_with(THEME_KEY, "\"light\"").load_theme().unwrap(), Theme::Light);
        assert_eq!(storage_with(THEME_KEY, "purple").load_theme().unwrap(), Theme::Dark);

        let storage = Storage::new(MemoryStore::new());
        storage.save_theme(Theme::Light).unwrap();
        assert_eq!(storage.load_theme().unwrap(), Theme::Light);
    }
}
