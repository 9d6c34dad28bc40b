use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// A 24-hour wall-clock time, stored as minutes since midnight.
/// Serialized as "HH:MM".
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u32);

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self(hour * 60 + minute))
        } else {
            None
        }
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }
}

impl FromStr for ClockTime {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> Result<Self> {
        let input = input.trim();
        let (h, m) = input
            .split_once(':')
            .ok_or_else(|| anyhow!("Invalid time '{}': expected HH:MM", input))?;

        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(anyhow!("Invalid time '{}': expected HH:MM", input));
        }
        let hour: u32 = h.parse().map_err(|_| anyhow!("Invalid hour in '{}'", input))?;
        let minute: u32 = m.parse().map_err(|_| anyhow!("Invalid minute in '{}'", input))?;

        ClockTime::new(hour, minute).ok_or_else(|| anyhow!("Time out of range: '{}'", input))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// Hours between two wall-clock times. An end before the start crosses
/// midnight; an end equal to the start counts as a full 24 hours.
pub fn shift_duration(start: ClockTime, end: ClockTime) -> f64 {
    let start_min = start.minutes();
    let mut end_min = end.minutes();
    if end_min <= start_min {
        end_min += MINUTES_PER_DAY;
    }
    (end_min - start_min) as f64 / 60.0
}

pub fn parse_iso_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid date '{}': expected YYYY-MM-DD", input))
}

/// Accepts plain ISO dates and timestamp-style values such as
/// "2024-06-01T00:00:00.000Z", using the date part only.
pub fn parse_loose_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    let date_part = input.get(..10).unwrap_or(input);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Parses a shift date relative to today. Shifts are logged after they
/// happen, so relative forms look backwards.
///
/// Supported: "today", "yesterday", "-Nd", "-Nw", weekday names (the most
/// recent such day, today included) and YYYY-MM-DD.
pub fn parse_shift_date(input: &str) -> Result<NaiveDate> {
    parse_shift_date_from(input, Local::now().date_naive())
}

pub fn parse_shift_date_from(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let lowered = input.trim().to_lowercase();

    match lowered.as_str() {
        "today" | "tod" => return Ok(today),
        "yesterday" | "yes" => return Ok(today - Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = lowered.strip_prefix('-') {
        if rest.len() < 2 {
            return Err(anyhow!("Invalid relative date: {}", input));
        }
        let (num_str, unit) = rest.split_at(rest.len() - 1);
        let count: i64 = num_str.parse().map_err(|_| anyhow!("Invalid relative date: {}", input))?;
        return match unit {
            "d" => Ok(today - Duration::days(count)),
            "w" => Ok(today - Duration::weeks(count)),
            _ => Err(anyhow!("Unknown unit in relative date: {}", unit)),
        };
    }

    if let Ok(weekday) = parse_weekday_str(&lowered) {
        let back = (today.weekday().num_days_from_sunday() as i64
            - weekday.num_days_from_sunday() as i64)
            .rem_euclid(7);
        return Ok(today - Duration::days(back));
    }

    parse_iso_date(input)
}

fn parse_weekday_str(s: &str) -> Result<Weekday> {
    match s {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        _ => Err(anyhow!("Invalid weekday")),
    }
}
