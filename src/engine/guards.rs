use chrono::{Duration, NaiveDateTime};

use crate::error::{Error, Result};
use crate::model::{BookingDate, Reservation};

/// Usage is compared before the increment: a booking is accepted while the
/// organization is strictly below its limit.
pub(crate) fn check_quota(used: u32, limit: u32, organization: &str) -> Result<()> {
    if used >= limit {
        return Err(Error::QuotaExceeded {
            organization: organization.to_string(),
            limit,
        });
    }
    Ok(())
}

/// A same-day meeting cannot be cancelled while the clock is within `cutoff`
/// of its start, on either side. Meetings on any other day are always
/// cancellable.
pub(crate) fn check_cancel_window(
    reservation: &Reservation,
    now: NaiveDateTime,
    cutoff: Duration,
) -> Result<()> {
    if reservation.date != BookingDate::of(now) {
        return Ok(());
    }
    let distance = (reservation.starts_at() - now).abs();
    if distance < cutoff {
        return Err(Error::TooLateToCancel { minutes_left: distance.num_minutes() });
    }
    Ok(())
}
