use chrono::{Datelike, NaiveDate, Weekday};

use crate::model::entry::ShiftType;
use crate::model::rate_card::RateCard;

/// Hourly rate for a shift. First matching rule wins:
/// sleepover, then Sunday, then Saturday, then night, then evening, then day.
///
/// Weekends outrank the shift type, so a Sunday night shift is paid at the
/// Sunday rate. `public_holiday` is never selected.
pub fn resolve_rate(card: &RateCard, shift_type: ShiftType, date: NaiveDate) -> f64 {
    if shift_type == ShiftType::Sleepover {
        return card.sleepover;
    }
    match date.weekday() {
        Weekday::Sun => return card.sunday,
        Weekday::Sat => return card.saturday,
        _ => {}
    }
    match shift_type {
        ShiftType::Night => card.night,
        ShiftType::Evening => card.evening,
        _ => card.day,
    }
}

pub fn travel_rate(card: &RateCard) -> f64 {
    card.km
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-06-01 is a Saturday
    fn saturday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }
    fn sunday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()
    }
    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 5).unwrap()
    }

    #[test]
    fn test_weekday_rates_follow_shift_type() {
        let card = RateCard::default();
        assert_eq!(resolve_rate(&card, ShiftType::Day, wednesday()), 65.0);
        assert_eq!(resolve_rate(&card, ShiftType::Evening, wednesday()), 72.0);
        assert_eq!(resolve_rate(&card, ShiftType::Night, wednesday()), 85.0);
    }

    #[test]
    fn test_weekend_beats_shift_type() {
        let card = RateCard::default();
        assert_eq!(resolve_rate(&card, ShiftType::Night, saturday()), 95.0);
        assert_eq!(resolve_rate(&card, ShiftType::Evening, saturday()), 95.0);
        assert_eq!(resolve_rate(&card, ShiftType::Night, sunday()), 125.0);
        assert_eq!(resolve_rate(&card, ShiftType::Day, sunday()), 125.0);
    }

    #[test]
    fn test_sleepover_is_flat() {
        let card = RateCard {
            sleepover: 300.0,
            ..RateCard::default()
        };
        for date in [saturday(), sunday(), wednesday()] {
            assert_eq!(resolve_rate(&card, ShiftType::Sleepover, date), 300.0);
        }
    }

    #[test]
    fn test_public_holiday_rate_is_never_selected() {
        let card = RateCard {
            public_holiday: 999.0,
            ..RateCard::default()
        };
        // 2024-12-25 is a Wednesday
        let christmas = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        assert_eq!(resolve_rate(&card, ShiftType::Day, christmas), card.day);
    }

    #[test]
    fn test_travel_rate_is_km() {
        let card = RateCard {
            km: 1.25,
            ..RateCard::default()
        };
        assert_eq!(travel_rate(&card), 1.25);
    }
}
