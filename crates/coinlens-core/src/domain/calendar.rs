use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month, OffsetDateTime};

use crate::ValidationError;

/// A UTC calendar day with no time component, serialized as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDay(Date);

impl CalendarDay {
    pub fn today_utc() -> Self {
        Self(OffsetDateTime::now_utc().date())
    }

    pub const fn from_date(date: Date) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u8, day: u8) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDate {
            value: format!("{year:04}-{month:02}-{day:02}"),
        };
        let month = Month::try_from(month).map_err(|_| invalid())?;
        Date::from_calendar_date(year, month, day)
            .map(Self)
            .map_err(|_| invalid())
    }

    /// Parse a strict `YYYY-MM-DD` string.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDate {
            value: input.to_owned(),
        };

        let mut parts = input.trim().splitn(3, '-');
        let (Some(year), Some(month), Some(day)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        if year.len() != 4 || month.len() != 2 || day.len() != 2 {
            return Err(invalid());
        }

        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u8>().map_err(|_| invalid())?;
        let day = day.parse::<u8>().map_err(|_| invalid())?;
        Self::from_ymd(year, month, day).map_err(|_| invalid())
    }

    /// Truncate an ISO 8601 timestamp such as `2024-03-01T00:00:00.0000000Z`
    /// to its calendar day.
    pub fn from_timestamp_prefix(input: &str) -> Result<Self, ValidationError> {
        let date_part = input.split('T').next().unwrap_or_default();
        Self::parse(date_part).map_err(|_| ValidationError::InvalidDate {
            value: input.to_owned(),
        })
    }

    pub const fn into_inner(self) -> Date {
        self.0
    }

    pub fn previous_day(self) -> Self {
        Self(self.0.saturating_sub(Duration::days(1)))
    }

    pub fn next_day(self) -> Self {
        Self(self.0.saturating_add(Duration::days(1)))
    }

    /// Same month/day one year earlier; February 29 maps to February 28.
    pub fn one_year_earlier(self) -> Self {
        let year = self.0.year() - 1;
        let date = self
            .0
            .replace_year(year)
            .or_else(|_| Date::from_calendar_date(year, self.0.month(), 28))
            .unwrap_or(self.0);
        Self(date)
    }

    pub fn first_of_year(self) -> Self {
        Self(Date::from_ordinal_date(self.0.year(), 1).unwrap_or(self.0))
    }

    /// Midnight timestamp used in upstream query strings.
    pub fn start_of_day_iso(self) -> String {
        format!("{self}T00:00:00")
    }
}

impl Display for CalendarDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

impl TryFrom<String> for CalendarDay {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CalendarDay> for String {
    fn from(value: CalendarDay) -> Self {
        value.to_string()
    }
}

/// Inclusive calendar-day window for historical queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: CalendarDay,
    pub end: CalendarDay,
}

impl DateWindow {
    pub fn new(start: CalendarDay, end: CalendarDay) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvertedWindow {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// `today - 1 year ..= today`.
    pub fn trailing_year(today: CalendarDay) -> Self {
        Self {
            start: today.one_year_earlier(),
            end: today,
        }
    }

    /// `January 1 ..= today`.
    pub fn year_to_date(today: CalendarDay) -> Self {
        Self {
            start: today.first_of_year(),
            end: today,
        }
    }

    /// Window covering exactly one day.
    pub fn single_day(day: CalendarDay) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    pub fn contains(&self, day: CalendarDay) -> bool {
        self.start <= day && day <= self.end
    }
}
