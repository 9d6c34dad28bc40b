use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::rate_card::RateCard;

pub const DEFAULT_STAFF_ROLE: &str = "support-worker";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default = "default_active")]
    pub active: bool,
    // Records written before rates moved onto staff have no card.
    #[serde(default)]
    pub rates: RateCard,
}

fn default_active() -> bool {
    true
}

impl Staff {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            role: DEFAULT_STAFF_ROLE.to_string(),
            email: String::new(),
            phone: String::new(),
            start_date: Local::now().date_naive().format("%Y-%m-%d").to_string(),
            active: true,
            rates: RateCard::default(),
        }
    }
}

pub fn find_staff<'a>(staff: &'a [Staff], id: &str) -> Option<&'a Staff> {
    staff.iter().find(|s| s.id == id)
}
