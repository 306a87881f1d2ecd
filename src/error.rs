use std::fmt;

/// The kind of record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Organization,
    Floor,
    Room,
    Booking,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Entity::User => "user",
            Entity::Organization => "organization",
            Entity::Floor => "floor",
            Entity::Room => "room",
            Entity::Booking => "booking",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Principal lacks the permission, or is not the owner of the booking.
    #[error("not allowed to {0}")]
    Forbidden(&'static str),

    #[error("{0} with these details already exists")]
    Conflict(Entity),

    #[error("{0} with these details not found")]
    NotFound(Entity),

    #[error("{0} is required")]
    RequiredParameter(&'static str),

    #[error("organization {organization} has used its quota of {limit} booking hours this month")]
    QuotaExceeded { organization: String, limit: u32 },

    #[error("meeting starts in {minutes_left} minutes; too late to cancel")]
    TooLateToCancel { minutes_left: i64 },

    #[error("date range needs exactly two bounds, got {0}")]
    InvalidRange(usize),

    #[error("invalid date {0:?}: expected dd-mm-yyyy")]
    InvalidDate(String),

    #[error("invalid slot {start}-{end}: hours must satisfy start < end <= 24")]
    InvalidSlot { start: u8, end: u8 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(&'static str),
}

impl Error {
    /// Short label for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Forbidden(_) => "forbidden",
            Error::Conflict(_) => "conflict",
            Error::NotFound(_) => "not_found",
            Error::RequiredParameter(_) => "required_parameter",
            Error::QuotaExceeded { .. } => "quota_exceeded",
            Error::TooLateToCancel { .. } => "too_late_to_cancel",
            Error::InvalidRange(_) => "invalid_range",
            Error::InvalidDate(_) => "invalid_date",
            Error::InvalidSlot { .. } => "invalid_slot",
            Error::LimitExceeded(_) => "limit_exceeded",
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
