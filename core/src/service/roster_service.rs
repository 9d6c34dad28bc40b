use anyhow::Result;
use tracing::info;

use crate::error::RosterError;
use crate::model::client::{is_numeric_name, Client};
use crate::model::rate_card::RateCard;
use crate::model::staff::Staff;
use crate::model::user::User;
use crate::repository::{KeyValueStore, Storage};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaffDraft {
    pub name: String,
    pub role: Option<String>,
    pub email: String,
    pub phone: String,
    pub start_date: Option<String>,
    pub rates: Option<RateCard>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaffPatch {
    pub name: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub start_date: Option<String>,
    pub active: Option<bool>,
}

fn require_manager(actor: &User) -> Result<(), RosterError> {
    if actor.is_manager() {
        Ok(())
    } else {
        Err(RosterError::Forbidden("only managers can change the roster".to_string()))
    }
}

fn require_name(name: &str) -> Result<String, RosterError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RosterError::Validation("name is required".to_string()));
    }
    Ok(name.to_string())
}

fn validate_rates(rates: &RateCard) -> Result<(), RosterError> {
    let invalid = rates.invalid_fields();
    if invalid.is_empty() {
        Ok(())
    } else {
        Err(RosterError::Validation(format!(
            "rates must be zero or more: {}",
            invalid.join(", ")
        )))
    }
}

fn staff_index(staff: &[Staff], id: &str) -> Result<usize, RosterError> {
    staff.iter().position(|s| s.id == id).ok_or_else(|| RosterError::NotFound {
        kind: "Staff member",
        id: id.to_string(),
    })
}

fn client_index(clients: &[Client], id: &str) -> Result<usize, RosterError> {
    clients.iter().position(|c| c.id == id).ok_or_else(|| RosterError::NotFound {
        kind: "Client",
        id: id.to_string(),
    })
}

/// Adds a staff member. Without explicit rates the default card applies.
pub fn onboard_staff(staff: &[Staff], draft: StaffDraft, actor: &User) -> Result<Vec<Staff>, RosterError> {
    require_manager(actor)?;
    let mut member = Staff::new(require_name(&draft.name)?);
    if let Some(rates) = draft.rates {
        validate_rates(&rates)?;
        member.rates = rates;
    }
    if let Some(role) = draft.role {
        member.role = role;
    }
    if let Some(start_date) = draft.start_date {
        member.start_date = start_date;
    }
    member.email = draft.email;
    member.phone = draft.phone;

    info!(id = %member.id, name = %member.name, "staff onboarded");
    let mut next = staff.to_vec();
    next.push(member);
    Ok(next)
}

pub fn update_staff(staff: &[Staff], id: &str, patch: StaffPatch, actor: &User) -> Result<Vec<Staff>, RosterError> {
    require_manager(actor)?;
    let idx = staff_index(staff, id)?;
    let mut next = staff.to_vec();
    let member = &mut next[idx];

    if let Some(name) = patch.name {
        member.name = require_name(&name)?;
    }
    if let Some(role) = patch.role {
        member.role = role;
    }
    if let Some(email) = patch.email {
        member.email = email;
    }
    if let Some(phone) = patch.phone {
        member.phone = phone;
    }
    if let Some(start_date) = patch.start_date {
        member.start_date = start_date;
    }
    if let Some(active) = patch.active {
        member.active = active;
    }
    info!(id, "staff updated");
    Ok(next)
}

/// Replaces a staff member's rate card. Existing entries keep the earnings
/// they were created with.
pub fn set_rates(staff: &[Staff], id: &str, rates: RateCard, actor: &User) -> Result<Vec<Staff>, RosterError> {
    require_manager(actor)?;
    validate_rates(&rates)?;
    let idx = staff_index(staff, id)?;
    let mut next = staff.to_vec();
    next[idx].rates = rates;
    info!(id, "rates updated");
    Ok(next)
}

/// Entries already logged for the member keep their name snapshot.
pub fn remove_staff(staff: &[Staff], id: &str, actor: &User) -> Result<Vec<Staff>, RosterError> {
    require_manager(actor)?;
    let idx = staff_index(staff, id)?;
    let mut next = staff.to_vec();
    next.remove(idx);
    info!(id, "staff removed");
    Ok(next)
}

fn require_client_name(name: &str) -> Result<String, RosterError> {
    let name = require_name(name)?;
    if is_numeric_name(&name) {
        return Err(RosterError::Validation(format!("'{}' is not a usable client name", name)));
    }
    Ok(name)
}

pub fn add_client(clients: &[Client], name: &str, actor: &User) -> Result<Vec<Client>, RosterError> {
    require_manager(actor)?;
    let client = Client::new(require_client_name(name)?);
    info!(id = %client.id, name = %client.name, "client added");
    let mut next = clients.to_vec();
    next.push(client);
    Ok(next)
}

pub fn rename_client(clients: &[Client], id: &str, name: &str, actor: &User) -> Result<Vec<Client>, RosterError> {
    require_manager(actor)?;
    let name = require_client_name(name)?;
    let idx = client_index(clients, id)?;
    let mut next = clients.to_vec();
    next[idx].name = name;
    info!(id, "client renamed");
    Ok(next)
}

pub fn remove_client(clients: &[Client], id: &str, actor: &User) -> Result<Vec<Client>, RosterError> {
    require_manager(actor)?;
    let idx = client_index(clients, id)?;
    let mut next = clients.to_vec();
    next.remove(idx);
    info!(id, "client removed");
    Ok(next)
}

/// Roster operations against a store.
pub struct RosterService<'a, S: KeyValueStore> {
    storage: &'a Storage<S>,
}

impl<'a, S: KeyValueStore> RosterService<'a, S> {
    pub fn new(storage: &'a Storage<S>) -> Self {
        Self { storage }
    }

    pub fn staff(&self) -> Result<Vec<Staff>> {
        self.storage.load_staff()
    }

    pub fn clients(&self) -> Result<Vec<Client>> {
        self.storage.load_clients()
    }

    pub fn onboard_staff(&self, draft: StaffDraft, actor: &User) -> Result<Staff> {
        let next = onboard_staff(&self.storage.load_staff()?, draft, actor)?;
        self.storage.save_staff(&next)?;
        next.last().cloned().ok_or_else(|| anyhow::anyhow!("onboarded staff missing"))
    }

    pub fn update_staff(&self, id: &str, patch: StaffPatch, actor: &User) -> Result<()> {
        let next = update_staff(&self.storage.load_staff()?, id, patch, actor)?;
        self.storage.save_staff(&next)
    }

    pub fn set_rates(&self, id: &str, rates: RateCard, actor: &User) -> Result<()> {
        let next = set_rates(&self.storage.load_staff()?, id, rates, actor)?;
        self.storage.save_staff(&next)
    }

    pub fn remove_staff(&self, id: &str, actor: &User) -> Result<()> {
        let next = remove_staff(&self.storage.load_staff()?, id, actor)?;
        self.storage.save_staff(&next)
    }

    pub fn add_client(&self, name: &str, actor: &User) -> Result<Client> {
        let next = add_client(&self.storage.load_clients()?, name, actor)?;
        self.storage.save_clients(&next)?;
        next.last().cloned().ok_or_else(|| anyhow::anyhow!("added client missing"))
    }

    pub fn rename_client(&self, id: &str, name: &str, actor: &User) -> Result<()> {
        let next = rename_client(&self.storage.load_clients()?, id, name, actor)?;
        self.storage.save_clients(&next)
    }

    pub fn remove_client(&self, id: &str, actor: &User) -> Result<()> {
        let next = remove_client(&self.storage.load_clients()?, id, actor)?;
        self.storage.save_clients(&next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::user::Role;
    use crate::repository::MemoryStore;

    fn manager() -> User {
        User::new("m1", "Mia", Role::Manager)
    }

    #[test]
    fn test_onboard_applies_default_rates() {
        let draft = StaffDraft {
            name: "  Raj Kumar ".to_string(),
            ..StaffDraft::default()
        };
        let staff = onboard_staff(&[], draft, &manager()).unwrap();
        assert_eq!(staff.len(), 1);
        assert_eq!(staff[0].name, "Raj Kumar");
        assert_eq!(staff[0].rates, RateCard::default());
        assert!(staff[0].active);
    }

    #[test]
    fn test_onboard_requires_manager_and_name() {
        let staff_actor = User::new("s1", "Raj", Role::Staff);
        let draft = StaffDraft {
            name: "Ana".to_string(),
            ..StaffDraft::default()
        };
        assert!(matches!(
            onboard_staff(&[], draft, &staff_actor),
            Err(RosterError::Forbidden(_))
        ));
        assert!(matches!(
            onboard_staff(&[], StaffDraft::default(), &manager()),
            Err(RosterError::Validation(_))
        ));
    }

    #[test]
    fn test_set_rates_validates() {
        let staff = onboard_staff(&[], StaffDraft { name: "Ana".to_string(), ..StaffDraft::default() }, &manager()).unwrap();
        let id = staff[0].id.clone();

        let bad = RateCard { sunday: -1.0, ..RateCard::default() };
        assert!(matches!(set_rates(&staff, &id, bad, &manager()), Err(RosterError::Validation(_))));

        let good = RateCard { sunday: 130.0, ..RateCard::default() };
        let next = set_rates(&staff, &id, good, &manager()).unwrap();
        assert_eq!(next[0].rates.sunday, 130.0);
        assert!(matches!(
            set_rates(&staff, "missing", good, &manager()),
            Err(RosterError::NotFound { .. })
        ));
    }

    #[test]
    fn test_update_and_remove_staff() {
        let staff = onboard_staff(&[], StaffDraft { name: "Ana".to_string(), ..StaffDraft::default() }, &manager()).unwrap();
        let id = staff[0].id.clone();
        let patch = StaffPatch {
            active: Some(false),
            phone: Some("0400000000".to_string()),
            ..StaffPatch::default()
        };
        let next = update_staff(&staff, &id, patch, &manager()).unwrap();
        assert!(!next[0].active);
        assert_eq!(next[0].phone, "0400000000");

        assert!(remove_staff(&next, &id, &manager()).unwrap().is_empty());
    }

    #[test]
    fn test_service_persists_roster_changes() {
        let storage = Storage::new(MemoryStore::new());
        let roster = RosterService::new(&storage);

        let member = roster
            .onboard_staff(StaffDraft { name: "Ana".to_string(), ..StaffDraft::default() }, &manager())
            .unwrap();
        let rates = RateCard { day: 70.0, ..RateCard::default() };
        roster.set_rates(&member.id, rates, &manager()).unwrap();
        assert_eq!(storage.load_staff().unwrap()[0].rates.day, 70.0);

        let client = roster.add_client("John Doe", &manager()).unwrap();
        let err = roster.remove_client(&client.id, &User::new("s1", "Raj", Role::Staff)).unwrap_err();
        assert!(matches!(err.downcast_ref::<RosterError>(), Some(RosterError::Forbidden(_))));
        assert_eq!(roster.clients().unwrap().len(), 1);
    }

    #[test]
    fn test_client_names_are_checked() {
        assert!(add_client(&[], "72.5", &manager()).is_err());
        assert!(add_client(&[], " ", &manager()).is_err());

        let clients = add_client(&[], "John Doe", &manager()).unwrap();
        let id = clients[0].id.clone();
        let renamed = rename_client(&clients, &id, "Jon Doe", &manager()).unwrap();
        assert_eq!(renamed[0].name, "Jon Doe");
        assert!(remove_client(&renamed, &id, &manager()).unwrap().is_empty());
    }
}
