use chrono::NaiveDate;
use tracing::debug;

use crate::model::entry::{EntryDraft, ShiftType, TimesheetEntry};
use crate::model::rate_card::RateCard;
use crate::service::rates::{resolve_rate, travel_rate};
use crate::time::{shift_duration, ClockTime};

/// The fields that drive pay for a shift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shift {
    pub date: NaiveDate,
    pub shift_type: ShiftType,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub km: f64,
}

impl From<&EntryDraft> for Shift {
    fn from(draft: &EntryDraft) -> Self {
        Self {
            date: draft.date,
            shift_type: draft.shift_type,
            start_time: draft.start_time,
            end_time: draft.end_time,
            km: draft.km,
        }
    }
}

impl From<&TimesheetEntry> for Shift {
    fn from(entry: &TimesheetEntry) -> Self {
        Self {
            date: entry.date,
            shift_type: entry.shift_type,
            start_time: entry.start_time,
            end_time: entry.end_time,
            km: entry.km,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Earnings {
    pub hours: f64,
    pub work_earnings: f64,
    pub travel_earnings: f64,
    pub total_earnings: f64,
}

impl Earnings {
    pub fn apply_to(&self, entry: &mut TimesheetEntry) {
        entry.hours = self.hours;
        entry.work_earnings = self.work_earnings;
        entry.travel_earnings = self.travel_earnings;
        entry.total_earnings = self.total_earnings;
    }
}

/// Hours and pay for a shift. Without a rate card the default card is used.
/// No rounding is applied.
pub fn compute_earnings(shift: &Shift, card: Option<&RateCard>) -> Earnings {
    let default_card = RateCard::default();
    let card = card.unwrap_or(&default_card);

    let hours = shift_duration(shift.start_time, shift.end_time);
    let rate = resolve_rate(card, shift.shift_type, shift.date);
    let work_earnings = hours * rate;
    let travel_earnings = shift.km * travel_rate(card);

    debug!(
        date = %shift.date,
        shift_type = %shift.shift_type,
        hours,
        rate,
        km = shift.km,
        "computed earnings"
    );

    Earnings {
        hours,
        work_earnings,
        travel_earnings,
        total_earnings: work_earnings + travel_earnings,
    }
}
