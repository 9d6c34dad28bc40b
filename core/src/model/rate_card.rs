use serde::{Deserialize, Serialize};

pub const DEFAULT_DAY_RATE: f64 = 65.0;
pub const DEFAULT_EVENING_RATE: f64 = 72.0;
pub const DEFAULT_NIGHT_RATE: f64 = 85.0;
pub const DEFAULT_SLEEPOVER_RATE: f64 = 250.0;
pub const DEFAULT_SATURDAY_RATE: f64 = 95.0;
pub const DEFAULT_SUNDAY_RATE: f64 = 125.0;
pub const DEFAULT_PUBLIC_HOLIDAY_RATE: f64 = 160.0;
pub const DEFAULT_KM_RATE: f64 = 0.96;

/// Per-staff pay schedule. Hourly rates plus a per-kilometre travel rate.
///
/// Every field falls back to its default when missing from stored data.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RateCard {
    #[serde(default = "default_day")]
    pub day: f64,
    #[serde(default = "default_evening")]
    pub evening: f64,
    #[serde(default = "default_night")]
    pub night: f64,
    #[serde(default = "default_sleepover")]
    pub sleepover: f64,
    #[serde(default = "default_saturday")]
    pub saturday: f64,
    #[serde(default = "default_sunday")]
    pub sunday: f64,
    // Not consulted by rate resolution: there is no holiday calendar.
    #[serde(default = "default_public_holiday")]
    pub public_holiday: f64,
    #[serde(default = "default_km")]
    pub km: f64,
}

fn default_day() -> f64 {
    DEFAULT_DAY_RATE
}

fn default_evening() -> f64 {
    DEFAULT_EVENING_RATE
}

fn default_night() -> f64 {
    DEFAULT_NIGHT_RATE
}

fn default_sleepover() -> f64 {
    DEFAULT_SLEEPOVER_RATE
}

fn default_saturday() -> f64 {
    DEFAULT_SATURDAY_RATE
}

fn default_sunday() -> f64 {
    DEFAULT_SUNDAY_RATE
}

fn default_public_holiday() -> f64 {
    DEFAULT_PUBLIC_HOLIDAY_RATE
}

fn default_km() -> f64 {
    DEFAULT_KM_RATE
}

impl Default for RateCard {
    fn default() -> Self {
        Self {
            day: DEFAULT_DAY_RATE,
            evening: DEFAULT_EVENING_RATE,
            night: DEFAULT_NIGHT_RATE,
            sleepover: DEFAULT_SLEEPOVER_RATE,
            saturday: DEFAULT_SATURDAY_RATE,
            sunday: DEFAULT_SUNDAY_RATE,
            public_holiday: DEFAULT_PUBLIC_HOLIDAY_RATE,
            km: DEFAULT_KM_RATE,
        }
    }
}

fn is_valid_rate(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

impl RateCard {
    fn fields(&self) -> [(&'static str, f64); 8] {
        [
            ("day", self.day),
            ("evening", self.evening),
            ("night", self.night),
            ("sleepover", self.sleepover),
            ("saturday", self.saturday),
            ("sunday", self.sunday),
            ("publicHoliday", self.public_holiday),
            ("km", self.km),
        ]
    }

    /// Names of the fields holding a negative or non-finite rate.
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        self.fields()
            .into_iter()
            .filter(|(_, value)| !is_valid_rate(*value))
            .map(|(name, _)| name)
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.invalid_fields().is_empty()
    }

    /// Replaces every invalid field with its default.
    pub fn sanitized(self) -> Self {
        let defaults = RateCard::default();
        let pick = |value: f64, fallback: f64| if is_valid_rate(value) { value } else { fallback };
        Self {
            day: pick(self.day, defaults.day),
            evening: pick(self.evening, defaults.evening),
            night: pick(self.night, defaults.night),
            sleepover: pick(self.sleepover, defaults.sleepover),
            saturday: pick(self.saturday, defaults.saturday),
            sunday: pick(self.sunday, defaults.sunday),
            public_holiday: pick(self.public_holiday, defaults.public_holiday),
            km: pick(self.km, defaults.km),
        }
    }
}
