use anyhow::Result;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EntryError;
use crate::model::client::{find_client, Client};
use crate::model::entry::{EntryDraft, EntryPatch, EntryStatus, TimesheetEntry};
use crate::model::staff::{find_staff, Staff};
use crate::model::user::{Role, User};
use crate::repository::{KeyValueStore, Storage};
use crate::service::earnings::{compute_earnings, Shift};

/// The people an entry can point at.
#[derive(Debug, Clone, Copy)]
pub struct Roster<'a> {
    pub staff: &'a [Staff],
    pub clients: &'a [Client],
}

fn validate_km(km: f64) -> Result<(), EntryError> {
    if km.is_finite() && km >= 0.0 {
        Ok(())
    } else {
        Err(EntryError::Validation(format!("km must be zero or more, got {}", km)))
    }
}

fn position(entries: &[TimesheetEntry], id: &str) -> Result<usize, EntryError> {
    entries
        .iter()
        .position(|e| e.id == id)
        .ok_or_else(|| EntryError::NotFound(id.to_string()))
}

/// Logs a new shift. Returns the collection with the entry appended.
pub fn create_entry(
    entries: &[TimesheetEntry],
    roster: &Roster,
    draft: EntryDraft,
    actor: &User,
) -> Result<Vec<TimesheetEntry>, EntryError> {
    let staff_id = match actor.role {
        Role::Client => {
            return Err(EntryError::Forbidden("clients cannot log shifts".to_string()));
        }
        Role::Staff => actor.id.clone(),
        Role::Manager => draft
            .staff_id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| actor.id.clone()),
    };

    let client = find_client(roster.clients, &draft.client_id)
        .ok_or_else(|| EntryError::Validation(format!("unknown client '{}'", draft.client_id)))?;
    let staff = find_staff(roster.staff, &staff_id)
        .ok_or_else(|| EntryError::Validation(format!("unknown staff member '{}'", staff_id)))?;
    validate_km(draft.km)?;

    let earnings = compute_earnings(&Shift::from(&draft), Some(&staff.rates));

    let entry = TimesheetEntry {
        id: Uuid::new_v4().to_string(),
        date: draft.date,
        staff_id: staff.id.clone(),
        staff_name: staff.name.clone(),
        client_id: client.id.clone(),
        client_name: client.name.clone(),
        service_type: draft.service_type,
        shift_type: draft.shift_type,
        location: draft.location,
        start_time: draft.start_time,
        end_time: draft.end_time,
        hours: earnings.hours,
        km: draft.km,
        work_earnings: earnings.work_earnings,
        travel_earnings: earnings.travel_earnings,
        total_earnings: earnings.total_earnings,
        notes: draft.notes,
        status: EntryStatus::Pending,
        synced_to_cloud: false,
    };

    info!(id = %entry.id, staff = %entry.staff_id, client = %entry.client_id, total = entry.total_earnings, "entry created");

    let mut next = entries.to_vec();
    next.push(entry);
    Ok(next)
}

/// Applies a patch to a pending entry and recomputes its earnings from the
/// owning staff member's current rate card.
pub fn edit_entry(
    entries: &[TimesheetEntry],
    staff: &[Staff],
    id: &str,
    patch: EntryPatch,
    actor: &User,
) -> Result<Vec<TimesheetEntry>, EntryError> {
    if actor.role == Role::Client {
        return Err(EntryError::Forbidden("clients cannot edit entries".to_string()));
    }
    let idx = position(entries, id)?;
    let current = &entries[idx];

    if !current.is_pending() {
        return Err(EntryError::Validation(format!(
            "entry {} is {} and can no longer be edited",
            id, current.status
        )));
    }
    if !actor.is_manager() && current.staff_id != actor.id {
        return Err(EntryError::Forbidden("staff can only edit their own entries".to_string()));
    }

    let mut updated = current.clone();
    if let Some(date) = patch.date {
        updated.date = date;
    }
    if let Some(service_type) = patch.service_type {
        updated.service_type = service_type;
    }
    if let Some(shift_type) = patch.shift_type {
        updated.shift_type = shift_type;
    }
    if let Some(location) = patch.location {
        updated.location = location;
    }
    if let Some(start_time) = patch.start_time {
        updated.start_time = start_time;
    }
    if let Some(end_time) = patch.end_time {
        updated.end_time = end_time;
    }
    if let Some(km) = patch.km {
        validate_km(km)?;
        updated.km = km;
    }
    if let Some(notes) = patch.notes {
        updated.notes = notes;
    }

    let card = find_staff(staff, &updated.staff_id).map(|s| &s.rates);
    if card.is_none() {
        warn!(id, staff = %updated.staff_id, "staff record missing, using default rates");
    }
    compute_earnings(&Shift::from(&updated), card).apply_to(&mut updated);
    updated.synced_to_cloud = false;

    info!(id, total = updated.total_earnings, "entry edited");

    let mut next = entries.to_vec();
    next[idx] = updated;
    Ok(next)
}

/// Approves or rejects a pending entry. Managers only.
pub fn set_status(
    entries: &[TimesheetEntry],
    id: &str,
    status: EntryStatus,
    actor: &User,
) -> Result<Vec<TimesheetEntry>, EntryError> {
    if !actor.is_manager() {
        return Err(EntryError::Forbidden("only managers can review entries".to_string()));
    }
    if status == EntryStatus::Pending {
        return Err(EntryError::Validation("an entry can only be approved or rejected".to_string()));
    }
    let idx = position(entries, id)?;
    if !entries[idx].is_pending() {
        return Err(EntryError::Validation(format!(
            "entry {} has already been {}",
            id, entries[idx].status
        )));
    }

    let mut next = entries.to_vec();
    next[idx].status = status;
    next[idx].synced_to_cloud = false;
    info!(id, %status, "entry reviewed");
    Ok(next)
}

/// Removes an entry. Managers can delete anything, staff only their own,
/// whatever the status.
pub fn delete_entry(
    entries: &[TimesheetEntry],
    id: &str,
    actor: &User,
) -> Result<Vec<TimesheetEntry>, EntryError> {
    if actor.role == Role::Client {
        return Err(EntryError::Forbidden("clients cannot delete entries".to_string()));
    }
    let idx = position(entries, id)?;
    if !actor.is_manager() && entries[idx].staff_id != actor.id {
        return Err(EntryError::Forbidden("staff can only delete their own entries".to_string()));
    }

    let mut next = entries.to_vec();
    next.remove(idx);
    info!(id, "entry deleted");
    Ok(next)
}

/// Runs the entry operations against a store: load, apply, persist, and
/// flag the sync status as having unpushed changes.
pub struct TimesheetService<'a, S: KeyValueStore> {
    storage: &'a Storage<S>,
}

impl<'a, S: KeyValueStore> TimesheetService<'a, S> {
    pub fn new(storage: &'a Storage<S>) -> Self {
        Self { storage }
    }

    pub fn list(&self) -> Result<Vec<TimesheetEntry>> {
        self.storage.load_entries()
    }

    pub fn create(&self, draft: EntryDraft, actor: &User) -> Result<TimesheetEntry> {
        let entries = self.storage.load_entries()?;
        let staff = self.storage.load_staff()?;
        let clients = self.storage.load_clients()?;
        let roster = Roster { staff: &staff, clients: &clients };

        let next = create_entry(&entries, &roster, draft, actor).map_err(|e| rejected(e, actor))?;
        let created = next.last().cloned().ok_or_else(|| anyhow::anyhow!("created entry missing"))?;
        self.commit(&next)?;
        Ok(created)
    }

    pub fn edit(&self, id: &str, patch: EntryPatch, actor: &User) -> Result<TimesheetEntry> {
        let entries = self.storage.load_entries()?;
        let staff = self.storage.load_staff()?;

        let next = edit_entry(&entries, &staff, id, patch, actor).map_err(|e| rejected(e, actor))?;
        let updated = next[position(&next, id)?].clone();
        self.commit(&next)?;
        Ok(updated)
    }

    pub fn set_status(&self, id: &str, status: EntryStatus, actor: &User) -> Result<()> {
        let entries = self.storage.load_entries()?;
        let next = set_status(&entries, id, status, actor).map_err(|e| rejected(e, actor))?;
        self.commit(&next)
    }

    pub fn delete(&self, id: &str, actor: &User) -> Result<()> {
        let entries = self.storage.load_entries()?;
        let next = delete_entry(&entries, id, actor).map_err(|e| rejected(e, actor))?;
        self.commit(&next)
    }

    fn commit(&self, entries: &[TimesheetEntry]) -> Result<()> {
        self.storage.save_entries(entries)?;
        let status = self.storage.load_sync_status()?.mark_dirty();
        self.storage.save_sync_status(&status)
    }
}

fn rejected(err: EntryError, actor: &User) -> anyhow::Error {
    warn!(actor = %actor.id, role = %actor.role, "rejected: {}", err);
    anyhow::Error::new(err)
}
