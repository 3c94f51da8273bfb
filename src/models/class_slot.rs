use std::{fmt, str::FromStr};

use jiff::civil::Time;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator between the weekday and the start time in a class id
pub const CLASS_ID_DELIMITER: char = '-';

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClassSlot {
    /// Composite key "{Weekday}-{HH:MM}", e.g. "Monday-09:00"
    pub id: String,
    /// Day of the week the class recurs on
    pub weekday: Weekday,
    pub subject: String,
    pub start_time: ClockTime,
    /// Earlier than `start_time` when the class runs past midnight
    pub end_time: ClockTime,
    pub professor: Option<String>,
    pub location: Option<String>,
    pub color: Option<String>,
}

impl ClassSlot {
    /// Whether `time` falls in the half-open `[start_time, end_time)` interval
    pub fn occupies(&self, time: ClockTime) -> bool {
        if self.end_time > self.start_time {
            self.start_time <= time && time < self.end_time
        } else {
            // Wrapped past midnight, runs until the end of the day
            self.start_time <= time
        }
    }
}

/// Builds the composite class id for a day and start time
pub fn class_id(weekday: Weekday, start_time: ClockTime) -> String {
    format!("{}{}{}", weekday, CLASS_ID_DELIMITER, start_time)
}

/// Fields supplied when adding a class to the timetable
#[derive(Debug, Clone, Default)]
pub struct ClassDraft {
    pub subject: String,
    /// Defaults to one hour after the start time
    pub end_time: Option<ClockTime>,
    pub professor: Option<String>,
    pub location: Option<String>,
    pub color: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl From<jiff::civil::Weekday> for Weekday {
    fn from(weekday: jiff::civil::Weekday) -> Self {
        use jiff::civil::Weekday as Civil;
        match weekday {
            Civil::Monday => Weekday::Monday,
            Civil::Tuesday => Weekday::Tuesday,
            Civil::Wednesday => Weekday::Wednesday,
            Civil::Thursday => Weekday::Thursday,
            Civil::Friday => Weekday::Friday,
            Civil::Saturday => Weekday::Saturday,
            Civil::Sunday => Weekday::Sunday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("Unknown weekday '{0}', expected a day name such as 'Monday' or 'mon'")]
pub struct WeekdayParseError(pub String);

impl FromStr for Weekday {
    type Err = WeekdayParseError;

    /// Accepts full names and three letter abbreviations, any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|day| {
                let name = day.name().to_lowercase();
                name == needle || (needle.len() == 3 && name.starts_with(&needle))
            })
            .ok_or_else(|| WeekdayParseError(s.to_string()))
    }
}

/// Wall clock time with minute resolution, written as zero-padded `HH:MM`
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(Time);

#[derive(Debug, Error, PartialEq)]
pub enum ClockTimeError {
    #[error("Invalid time '{0}', expected HH:MM (24-hour)")]
    Malformed(String),

    #[error("Time '{0}' is out of range")]
    OutOfRange(String),
}

impl ClockTime {
    pub fn new(hour: i8, minute: i8) -> Result<Self, ClockTimeError> {
        Time::new(hour, minute, 0, 0)
            .map(ClockTime)
            .map_err(|_| ClockTimeError::OutOfRange(format!("{:02}:{:02}", hour, minute)))
    }

    pub fn hour(self) -> i8 {
        self.0.hour()
    }

    pub fn minute(self) -> i8 {
        self.0.minute()
    }

    /// One hour later, wrapping 23:xx around to 00:xx
    pub fn plus_one_hour(self) -> Self {
        let hour = (self.hour() + 1) % 24;
        ClockTime(Time::constant(hour, self.minute(), 0, 0))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = ClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ClockTimeError::Malformed(s.to_string());

        let (hours, minutes) = s.trim().split_once(':').ok_or_else(malformed)?;
        let is_two_digits =
            |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
        if !is_two_digits(hours) || !is_two_digits(minutes) {
            return Err(malformed());
        }
        let hour: i8 = hours.parse().map_err(|_| malformed())?;
        let minute: i8 = minutes.parse().map_err(|_| malformed())?;

        ClockTime::new(hour, minute).map_err(|_| ClockTimeError::OutOfRange(s.to_string()))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ClockTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}
