use chrono::Duration;

use crate::limits::{CANCEL_CUTOFF_MINUTES, MONTHLY_QUOTA_HOURS};

/// Tunables of the booking engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingPolicy {
    /// Bookings an organization may hold per calendar month (one hour each).
    pub monthly_quota_hours: u32,
    /// Minimum lead time for cancelling a same-day booking.
    pub cancel_cutoff: Duration,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            monthly_quota_hours: MONTHLY_QUOTA_HOURS,
            cancel_cutoff: Duration::minutes(CANCEL_CUTOFF_MINUTES),
        }
    }
}

impl BookingPolicy {
    /// Defaults, overridden by `ROOMBOOK_MONTHLY_QUOTA_HOURS` and
    /// `ROOMBOOK_CANCEL_CUTOFF_MINUTES` when they parse.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let monthly_quota_hours: u32 = std::env::var("ROOMBOOK_MONTHLY_QUOTA_HOURS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.monthly_quota_hours);
        let cancel_cutoff = std::env::var("ROOMBOOK_CANCEL_CUTOFF_MINUTES")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .filter(|m| *m >= 0)
            .map(Duration::minutes)
            .unwrap_or(defaults.cancel_cutoff);
        Self { monthly_quota_hours, cancel_cutoff }
    }
}
