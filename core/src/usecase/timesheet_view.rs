use anyhow::Result;
use chrono::NaiveDate;

use crate::model::entry::{EntryStatus, TimesheetEntry};
use crate::model::user::User;
use crate::repository::{KeyValueStore, Storage};

/// Narrows a listing. Date bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EntryFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<EntryStatus>,
}

impl EntryFilter {
    fn matches(&self, entry: &TimesheetEntry) -> bool {
        self.from.map_or(true, |from| entry.date >= from)
            && self.to.map_or(true, |to| entry.date <= to)
            && self.status.map_or(true, |status| entry.status == status)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EntryTotals {
    pub count: usize,
    pub hours: f64,
    pub km: f64,
    pub earnings: f64,
}

/// Entries the actor may see, newest first.
pub fn visible_entries(actor: &User, entries: &[TimesheetEntry], filter: &EntryFilter) -> Vec<TimesheetEntry> {
    let mut visible: Vec<TimesheetEntry> = entries
        .iter()
        .filter(|e| actor.can_see(e) && filter.matches(e))
        .cloned()
        .collect();
    visible.sort_by(|a, b| b.date.cmp(&a.date));
    visible
}

pub fn totals(entries: &[TimesheetEntry]) -> EntryTotals {
    entries.iter().fold(EntryTotals::default(), |acc, e| EntryTotals {
        count: acc.count + 1,
        hours: acc.hours + e.hours,
        km: acc.km + e.km,
        earnings: acc.earnings + e.total_earnings,
    })
}

pub struct TimesheetView<'a, S: KeyValueStore> {
    storage: &'a Storage<S>,
}

impl<'a, S: KeyValueStore> TimesheetView<'a, S> {
    pub fn new(storage: &'a Storage<S>) -> Self {
        Self { storage }
    }

    pub fn list(&self, actor: &User, filter: &EntryFilter) -> Result<Vec<TimesheetEntry>> {
        let entries = self.storage.load_entries()?;
        Ok(visible_entries(actor, &entries, filter))
    }
}
