use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::time::ClockTime;

pub const DEFAULT_LOCATION: &str = "Community";
pub const DEFAULT_SERVICE_TYPE: &str = "community-access";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ShiftType {
    Day,
    Evening,
    Night,
    Sleepover,
}

impl Default for ShiftType {
    fn default() -> Self {
        ShiftType::Day
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ShiftType::Day => "day",
            ShiftType::Evening => "evening",
            ShiftType::Night => "night",
            ShiftType::Sleepover => "sleepover",
        };
        f.write_str(s)
    }
}

impl FromStr for ShiftType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" | "d" => Ok(ShiftType::Day),
            "evening" | "e" => Ok(ShiftType::Evening),
            "night" | "n" => Ok(ShiftType::Night),
            "sleepover" | "s" => Ok(ShiftType::Sleepover),
            _ => Err(anyhow!("Unknown shift type: '{}'", s)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Pending,
    Approved,
    Rejected,
}

impl Default for EntryStatus {
    fn default() -> Self {
        EntryStatus::Pending
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntryStatus::Pending => "pending",
            EntryStatus::Approved => "approved",
            EntryStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

impl FromStr for EntryStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(EntryStatus::Pending),
            "approved" => Ok(EntryStatus::Approved),
            "rejected" => Ok(EntryStatus::Rejected),
            _ => Err(anyhow!("Unknown status: '{}'", s)),
        }
    }
}

/// One logged shift. Hours and the earnings fields are derived; the staff
/// and client names are copied in when the entry is created and stay put
/// even if the person is later renamed or removed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetEntry {
    pub id: String,
    pub date: NaiveDate,
    pub staff_id: String,
    pub staff_name: String,
    pub client_id: String,
    pub client_name: String,
    #[serde(default)]
    pub service_type: String,
    #[serde(default)]
    pub shift_type: ShiftType,
    #[serde(default)]
    pub location: String,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub hours: f64,
    pub km: f64,
    pub work_earnings: f64,
    pub travel_earnings: f64,
    pub total_earnings: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: EntryStatus,
    #[serde(default)]
    pub synced_to_cloud: bool,
}

impl TimesheetEntry {
    pub fn is_pending(&self) -> bool {
        self.status == EntryStatus::Pending
    }
}

/// Input for logging a new shift.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub date: NaiveDate,
    // Ignored for staff actors, who always log against themselves.
    pub staff_id: Option<String>,
    pub client_id: String,
    pub service_type: String,
    pub shift_type: ShiftType,
    pub location: String,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub km: f64,
    pub notes: String,
}

impl EntryDraft {
    pub fn new(date: NaiveDate, client_id: String, start_time: ClockTime, end_time: ClockTime) -> Self {
        Self {
            date,
            staff_id: None,
            client_id,
            service_type: DEFAULT_SERVICE_TYPE.to_string(),
            shift_type: ShiftType::default(),
            location: DEFAULT_LOCATION.to_string(),
            start_time,
            end_time,
            km: 0.0,
            notes: String::new(),
        }
    }
}

/// Changes to a pending entry. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    pub date: Option<NaiveDate>,
    pub service_type: Option<String>,
    pub shift_type: Option<ShiftType>,
    pub location: Option<String>,
    pub start_time: Option<ClockTime>,
    pub end_time: Option<ClockTime>,
    pub km: Option<f64>,
    pub notes: Option<String>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        *self == EntryPatch::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_serializes_with_camel_case_keys() {
        let entry = TimesheetEntry {
            id: "1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            staff_id: "s1".to_string(),
            staff_name: "Raj".to_string(),
            client_id: "c1".to_string(),
            client_name: "John".to_string(),
            service_type: DEFAULT_SERVICE_TYPE.to_string(),
            shift_type: ShiftType::Sleepover,
            location: DEFAULT_LOCATION.to_string(),
            start_time: "22:00".parse().unwrap(),
            end_time: "06:00".parse().unwrap(),
            hours: 8.0,
            km: 0.0,
            work_earnings: 250.0 * 8.0,
            travel_earnings: 0.0,
            total_earnings: 2000.0,
            notes: String::new(),
            status: EntryStatus::Approved,
            synced_to_cloud: false,
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["staffId"], "s1");
        assert_eq!(json["date"], "2024-06-01");
        assert_eq!(json["shiftType"], "sleepover");
        assert_eq!(json["startTime"], "22:00");
        assert_eq!(json["status"], "approved");
        assert_eq!(json["syncedToCloud"], false);

        let back: TimesheetEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_parse_shift_type_and_status() {
        assert_eq!("Night".parse::<ShiftType>().unwrap(), ShiftType::Night);
        assert_eq!("s".parse::<ShiftType>().unwrap(), ShiftType::Sleepover);
        assert!("morning".parse::<ShiftType>().is_err());
        assert_eq!("APPROVED".parse::<EntryStatus>().unwrap(), EntryStatus::Approved);
        assert!("done".parse::<EntryStatus>().is_err());
    }
}
