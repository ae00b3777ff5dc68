use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use std::fmt;
use thiserror::Error;

/// Errors raised while decoding CF time coordinates
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimeError {
    #[error("Invalid time units '{0}'. Expected '<unit> since <date>'")]
    InvalidUnits(String),

    #[error("Unsupported time unit: {0}")]
    UnsupportedUnit(String),

    #[error("Unsupported calendar: {0}")]
    UnsupportedCalendar(String),

    #[error("Invalid reference date: {0}")]
    InvalidReferenceDate(String),

    #[error("Time value out of range: {0}")]
    OutOfRange(f64),
}

/// Month-resolution timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MonthStamp {
    pub year: i32,
    pub month: u32,
}

impl MonthStamp {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: &NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }
}

impl fmt::Display for MonthStamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// CF calendars understood by the time decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calendar {
    /// Mixed Gregorian/Julian, treated as proleptic Gregorian
    Standard,
    /// Twelve 30-day months
    Day360,
    /// Gregorian months without leap days
    NoLeap,
}

impl Calendar {
    pub fn parse(name: &str) -> Result<Self, TimeError> {
        match name.trim().to_lowercase().as_str() {
            "" | "standard" | "gregorian" | "proleptic_gregorian" => Ok(Calendar::Standard),
            "360_day" => Ok(Calendar::Day360),
            "noleap" | "365_day" => Ok(Calendar::NoLeap),
            other => Err(TimeError::UnsupportedCalendar(other.to_string())),
        }
    }
}

/// Unit of a CF time offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    fn parse(unit: &str) -> Result<Self, TimeError> {
        match unit.to_lowercase().as_str() {
            "days" | "day" | "d" => Ok(TimeUnit::Days),
            "hours" | "hour" | "hrs" | "hr" | "h" => Ok(TimeUnit::Hours),
            "minutes" | "minute" | "mins" | "min" => Ok(TimeUnit::Minutes),
            "seconds" | "second" | "secs" | "sec" | "s" => Ok(TimeUnit::Seconds),
            other => Err(TimeError::UnsupportedUnit(other.to_string())),
        }
    }

    /// Length of one unit in days
    pub fn in_days(&self) -> f64 {
        match self {
            TimeUnit::Days => 1.0,
            TimeUnit::Hours => 1.0 / 24.0,
            TimeUnit::Minutes => 1.0 / 1440.0,
            TimeUnit::Seconds => 1.0 / 86400.0,
        }
    }
}

/// Parsed CF `units` attribute of a time coordinate
#[derive(Debug, Clone, PartialEq)]
pub struct CfTimeUnits {
    pub unit: TimeUnit,
    pub reference: NaiveDateTime,
}

const REFERENCE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse `"<unit> since <reference date>"`
pub fn parse_cf_time_units(units: &str) -> Result<CfTimeUnits, TimeError> {
    let (unit, reference) = units
        .split_once(" since ")
        .ok_or_else(|| TimeError::InvalidUnits(units.to_string()))?;
    let unit = TimeUnit::parse(unit.trim())?;

    let reference = reference
        .trim()
        .trim_end_matches(" UTC")
        .trim_end_matches('Z')
        .trim();

    let parsed = REFERENCE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(reference, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(reference, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| TimeError::InvalidReferenceDate(reference.to_string()))?;

    Ok(CfTimeUnits {
        unit,
        reference: parsed,
    })
}

/// Decode raw CF time values into month stamps
pub fn decode_cf_times(
    values: &[f64],
    units: &str,
    calendar: Calendar,
) -> Result<Vec<MonthStamp>, TimeError> {
    let units = parse_cf_time_units(units)?;
    values
        .iter()
        .map(|&value| decode_one(value, &units, calendar))
        .collect()
}

fn decode_one(value: f64, units: &CfTimeUnits, calendar: Calendar) -> Result<MonthStamp, TimeError> {
    if !value.is_finite() {
        return Err(TimeError::OutOfRange(value));
    }
    let offset_days = value * units.unit.in_days();
    let reference = units.reference;

    match calendar {
        Calendar::Standard => {
            let millis = (offset_days * 86_400_000.0).round();
            if millis.abs() > i64::MAX as f64 {
                return Err(TimeError::OutOfRange(value));
            }
            let stamp = reference
                .checked_add_signed(Duration::milliseconds(millis as i64))
                .ok_or(TimeError::OutOfRange(value))?;
            Ok(MonthStamp::from_date(&stamp.date()))
        }
        Calendar::Day360 => {
            let day_fraction = seconds_of_day(&reference) / 86400.0;
            let start = (reference.year() as f64 * 12.0 + reference.month0() as f64) * 30.0
                + reference.day0() as f64
                + day_fraction;
            let months = ((start + offset_days) / 30.0).floor() as i64;
            Ok(MonthStamp::new(
                months.div_euclid(12) as i32,
                months.rem_euclid(12) as u32 + 1,
            ))
        }
        Calendar::NoLeap => {
            let day_fraction = seconds_of_day(&reference) / 86400.0;
            let start = reference.year() as f64 * 365.0
                + NOLEAP_CUMULATIVE_DAYS[reference.month0() as usize] as f64
                + reference.day0() as f64
                + day_fraction;
            let total = (start + offset_days).floor() as i64;
            let year = total.div_euclid(365);
            let day_of_year = total.rem_euclid(365);
            let month = NOLEAP_CUMULATIVE_DAYS
                .iter()
                .rposition(|&first| first as i64 <= day_of_year)
                .map(|index| index as u32 + 1)
                .unwrap_or(1);
            Ok(MonthStamp::new(year as i32, month))
        }
    }
}

const NOLEAP_CUMULATIVE_DAYS: [u32; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

fn seconds_of_day(stamp: &NaiveDateTime) -> f64 {
    stamp.time().num_seconds_from_midnight() as f64
}

/// The twelve month stamps of a calendar year
pub fn month_stamps(year: i32) -> Vec<MonthStamp> {
    (1..=12).map(|month| MonthStamp::new(year, month)).collect()
}

/// Month containing a given day of year (1-based)
pub fn month_from_day_of_year(year: i32, day_of_year: u32) -> Option<MonthStamp> {
    NaiveDate::from_yo_opt(year, day_of_year).map(|date| MonthStamp::from_date(&date))
}
