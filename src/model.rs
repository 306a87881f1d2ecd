use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::auth::PermissionSet;
use crate::error::{Error, Result};
use crate::limits::DATE_FORMAT;

// ── Directory records ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: Ulid,
    pub name: String,
    pub contact_info: String,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Ulid,
    /// Always lowercase.
    pub email: String,
    pub name: String,
    pub role: Role,
    pub permissions: PermissionSet,
    /// `None` for admin accounts.
    pub organization: Option<String>,
}

// ── Space records ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Floor {
    pub id: Ulid,
    pub number: u32,
    pub rooms_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: Ulid,
    pub name: String,
    pub floor: u32,
    pub capacity: u32,
    pub has_projector: bool,
    pub is_available: bool,
    pub details: serde_json::Value,
}

// ── Time values ──────────────────────────────────────────────────

/// Whole-hour booking window `[start, end)`. Two slots are the same slot only
/// if both boundaries match; overlapping slots are distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot {
    start: u8,
    end: u8,
}

impl Slot {
    pub fn new(start: u8, end: u8) -> Result<Self> {
        if start >= end || end > 24 {
            return Err(Error::InvalidSlot { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start_hour(&self) -> u8 {
        self.start
    }

    pub fn start_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.start.into(), 0, 0).unwrap_or_default()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00-{:02}:00", self.start, self.end)
    }
}

/// Calendar day of a booking, rendered `dd-mm-yyyy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingDate(NaiveDate);

impl BookingDate {
    pub fn parse(input: &str) -> Result<Self> {
        NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
            .map(Self)
            .map_err(|_| Error::InvalidDate(input.to_string()))
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| Error::InvalidDate(format!("{day:02}-{month:02}-{year}")))
    }

    pub fn of(now: NaiveDateTime) -> Self {
        Self(now.date())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn month(&self) -> YearMonth {
        YearMonth { year: self.0.year(), month: self.0.month() }
    }

    pub fn at(&self, time: NaiveTime) -> NaiveDateTime {
        self.0.and_time(time)
    }
}

impl From<NaiveDate> for BookingDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for BookingDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(now: NaiveDateTime) -> Self {
        BookingDate::of(now).month()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{}", self.month, self.year)
    }
}

/// Inclusive `[start, end]` filter over booking dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: BookingDate,
    pub end: BookingDate,
}

impl DateRange {
    pub fn from_bounds(bounds: &[BookingDate]) -> Result<Self> {
        match bounds {
            [start, end] => Ok(Self { start: *start, end: *end }),
            _ => Err(Error::InvalidRange(bounds.len())),
        }
    }

    pub fn contains(&self, date: &BookingDate) -> bool {
        self.start <= *date && *date <= self.end
    }
}

// ── Reservations ─────────────────────────────────────────────────

/// Identity of a reservation: at most one booking per (room, date, slot).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReservationKey {
    pub room: String,
    pub date: BookingDate,
    pub slot: Slot,
}

impl ReservationKey {
    pub fn new(room: impl Into<String>, date: BookingDate, slot: Slot) -> Self {
        Self { room: room.into(), date, slot }
    }
}

impl fmt::Display for ReservationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.room, self.date, self.slot)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub room: String,
    pub date: BookingDate,
    pub slot: Slot,
    pub user: String,
    pub organization: String,
    pub booked_at: NaiveDateTime,
}

impl Reservation {
    pub fn key(&self) -> ReservationKey {
        ReservationKey::new(self.room.clone(), self.date, self.slot)
    }

    /// When the meeting begins.
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.at(self.slot.start_time())
    }
}

/// Monthly usage counter key: one bucket per organization per calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UsageKey {
    pub organization: String,
    pub month: YearMonth,
}
