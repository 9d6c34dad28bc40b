use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::model::entry::TimesheetEntry;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Manager,
    Staff,
    Client,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Manager => "manager",
            Role::Staff => "staff",
            Role::Client => "client",
        };
        f.write_str(s)
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "manager" | "m" => Ok(Role::Manager),
            "staff" | "s" => Ok(Role::Staff),
            "client" | "c" => Ok(Role::Client),
            _ => Err(anyhow!("Unknown role: '{}'", s)),
        }
    }
}

/// The acting identity, as supplied by whoever authenticated the caller.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }

    pub fn is_manager(&self) -> bool {
        self.role == Role::Manager
    }

    /// Managers see every entry, staff their own shifts, clients the shifts
    /// logged against them.
    pub fn can_see(&self, entry: &TimesheetEntry) -> bool {
        match self.role {
            Role::Manager => true,
            Role::Staff => entry.staff_id == self.id,
            Role::Client => entry.client_id == self.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entry::{EntryStatus, ShiftType};
    use chrono::NaiveDate;

    fn entry(staff_id: &str, client_id: &str) -> TimesheetEntry {
        TimesheetEntry {
            id: "e1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
            staff_id: staff_id.to_string(),
            staff_name: String::new(),
            client_id: client_id.to_string(),
            client_name: String::new(),
            service_type: String::new(),
            shift_type: ShiftType::Day,
            location: String::new(),
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

    #[test]
    fn test_can_see_by_role() {
        let e = entry("s1", "c1");
        assert!(User::new("m1", "Mia", Role::Manager).can_see(&e));
        assert!(User::new("s1", "Raj", Role::Staff).can_see(&e));
        assert!(!User::new("s2", "Ana", Role::Staff).can_see(&e));
        assert!(User::new("c1", "John", Role::Client).can_see(&e));
        assert!(!User::new("s1", "Raj", Role::Client).can_see(&e));
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("M".parse::<Role>().unwrap(), Role::Manager);
        assert_eq!("staff".parse::<Role>().unwrap(), Role::Staff);
        assert!("admin".parse::<Role>().is_err());
    }
}
