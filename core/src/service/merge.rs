use std::collections::HashSet;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::model::entry::{EntryStatus, ShiftType, TimesheetEntry, DEFAULT_LOCATION};
use crate::model::staff::{find_staff, Staff};
use crate::model::user::User;
use crate::service::rates::{resolve_rate, travel_rate};
use crate::time::{parse_loose_date, ClockTime};

const DEFAULT_START: &str = "09:00";
const DEFAULT_END: &str = "17:00";

// Namespace for ids derived from the content of remote records that
// arrive without one.
const REMOTE_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6d1f_3c2e_8a4b_4f0e_9b7d_2c5a_1e3f_8d90);

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub entries: Vec<TimesheetEntry>,
    pub added: usize,
}

/// Spellings a remote sheet may use for a camelCase field: the name itself,
/// PascalCase, PascalCase with a trailing "ID", and all caps.
/// `staffId` gives `staffId`, `StaffId`, `StaffID`, `STAFFID`.
fn key_variants(camel: &str) -> Vec<String> {
    let mut variants = vec![camel.to_string()];
    let mut chars = camel.chars();
    if let Some(first) = chars.next() {
        let pascal: String = first.to_uppercase().chain(chars).collect();
        if let Some(stem) = pascal.strip_suffix("Id") {
            variants.push(format!("{}ID", stem));
        }
        variants.push(pascal);
    }
    variants.push(camel.to_uppercase());

    let mut unique: Vec<String> = Vec::with_capacity(variants.len());
    for variant in variants {
        if !unique.contains(&variant) {
            unique.push(variant);
        }
    }
    unique
}

/// Field access over one loosely-typed remote record.
struct RemoteRecord<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> RemoteRecord<'a> {
    fn raw(&self, camel: &str) -> Option<&'a Value> {
        let fields: &'a Map<String, Value> = self.fields;
        key_variants(camel)
            .iter()
            .filter_map(|key| fields.get(key.as_str()))
            .find(|value| match value {
                Value::Null => false,
                Value::String(s) => !s.trim().is_empty(),
                _ => true,
            })
    }

    fn text(&self, camel: &str) -> String {
        match self.raw(camel) {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    fn number(&self, camel: &str) -> f64 {
        let value = match self.raw(camel) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match value.filter(|v| v.is_finite()) {
            Some(v) if v < 0.0 => {
                warn!(field = camel, value = v, "negative remote value clamped to zero");
                0.0
            }
            Some(v) => v,
            None => 0.0,
        }
    }

    fn or_default(&self, camel: &str, default: &str) -> String {
        let text = self.text(camel);
        if text.is_empty() {
            default.to_string()
        } else {
            text
        }
    }
}

fn clock_or(text: &str, default: &str) -> ClockTime {
    text.parse().or_else(|_| default.parse()).unwrap_or_default()
}

fn derived_id(fields: &Map<String, Value>) -> String {
    let canonical = Value::Object(fields.clone()).to_string();
    Uuid::new_v5(&REMOTE_ID_NAMESPACE, canonical.as_bytes()).to_string()
}

/// Turns one remote record into an entry, filling gaps with defaults and
/// recomputing earnings the remote store left at zero.
pub fn normalize_remote(record: &Value, staff: &[Staff]) -> Option<TimesheetEntry> {
    let fields = match record.as_object() {
        Some(fields) => fields,
        None => {
            warn!(record = %record, "ignoring remote record that is not an object");
            return None;
        }
    };
    let r = RemoteRecord { fields };

    let id = match r.text("id") {
        id if id.is_empty() => derived_id(fields),
        id => id,
    };
    let staff_id = r.text("staffId");
    let member = find_staff(staff, &staff_id);

    let date_text = r.text("date");
    let date = parse_loose_date(&date_text).unwrap_or_else(|| {
        warn!(id = %id, date = %date_text, "remote entry has no usable date");
        NaiveDate::default()
    });
    let shift_type = r.text("shiftType").parse::<ShiftType>().unwrap_or_default();
    let status = r.text("status").parse::<EntryStatus>().unwrap_or_default();

    let hours = r.number("hours");
    let km = r.number("km");
    let mut work_earnings = r.number("workEarnings");
    let mut travel_earnings = r.number("travelEarnings");

    if let Some(member) = member {
        if work_earnings == 0.0 && hours > 0.0 {
            work_earnings = hours * resolve_rate(&member.rates, shift_type, date);
            debug!(id = %id, work_earnings, "recomputed work earnings");
        }
        if travel_earnings == 0.0 && km > 0.0 {
            travel_earnings = km * travel_rate(&member.rates);
            debug!(id = %id, travel_earnings, "recomputed travel earnings");
        }
    }

    let staff_name = match r.text("staffName") {
        name if name.is_empty() => member.map(|m| m.name.clone()).unwrap_or_default(),
        name => name,
    };

    Some(TimesheetEntry {
        id,
        date,
        staff_id,
        staff_name,
        client_id: r.text("clientId"),
        client_name: r.text("clientName"),
        service_type: r.text("serviceType"),
        shift_type,
        location: r.or_default("location", DEFAULT_LOCATION),
        start_time: clock_or(&r.text("startTime"), DEFAULT_START),
        end_time: clock_or(&r.text("endTime"), DEFAULT_END),
        hours,
        km,
        work_earnings,
        travel_earnings,
        // Whatever total the remote sent is ignored.
        total_earnings: work_earnings + travel_earnings,
        notes: r.text("notes"),
        status,
        synced_to_cloud: true,
    })
}

/// Reads a stored entry written in an older or looser shape. Same rules as
/// a remote record, but the synced flag is kept as stored.
pub fn normalize_stored(record: &Value, staff: &[Staff]) -> Option<TimesheetEntry> {
    let mut entry = normalize_remote(record, staff)?;
    entry.synced_to_cloud = record
        .get("syncedToCloud")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    Some(entry)
}

/// Folds a remote batch into the local entries. Local entries always win:
/// a remote record whose id is already present is dropped, never applied.
/// Non-managers only receive records that belong to them.
///
/// Merging the same batch twice adds nothing the second time.
pub fn merge(local: &[TimesheetEntry], remote: &[Value], staff: &[Staff], actor: &User) -> MergeOutcome {
    let mut seen: HashSet<String> = local.iter().map(|e| e.id.clone()).collect();
    let mut merged = local.to_vec();
    let mut skipped_foreign = 0usize;
    let mut skipped_known = 0usize;

    for entry in remote.iter().filter_map(|record| normalize_remote(record, staff)) {
        if !actor.can_see(&entry) {
            skipped_foreign += 1;
            continue;
        }
        if !seen.insert(entry.id.clone()) {
            skipped_known += 1;
            continue;
        }
        merged.push(entry);
    }

    let added = merged.len() - local.len();
    info!(
        remote = remote.len(),
        added,
        skipped_known,
        skipped_foreign,
        "merged remote entries"
    );

    MergeOutcome { entries: merged, added }
}
