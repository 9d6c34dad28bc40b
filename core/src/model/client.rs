use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A person receiving support. Identity and display name only.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Client {
    pub id: String,
    pub name: String,
}

impl Client {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
        }
    }
}

pub fn find_client<'a>(clients: &'a [Client], id: &str) -> Option<&'a Client> {
    clients.iter().find(|c| c.id == id)
}

/// True for names like "65" or "72.5", which are left behind when rate
/// columns were read back as client names.
pub fn is_numeric_name(name: &str) -> bool {
    let mut parts = name.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let frac = parts.next();
    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    all_digits(whole) && frac.map_or(true, all_digits)
}
