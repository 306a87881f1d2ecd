/// Booking-hours an organization may consume per calendar month.
pub const MONTHLY_QUOTA_HOURS: u32 = 30;

/// Same-day bookings cannot be cancelled with fewer minutes than this left.
pub const CANCEL_CUTOFF_MINUTES: i64 = 15;

pub const MAX_NAME_LEN: usize = 256;
pub const MAX_EMAIL_LEN: usize = 320;

/// Rendering of a `BookingDate`, also the accepted input format.
pub const DATE_FORMAT: &str = "%d-%m-%Y";
