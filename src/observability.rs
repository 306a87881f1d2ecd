use crate::error::Error;

// ── Booking metrics ─────────────────────────────────────────────
// No exporter is installed here; the host process picks a recorder.

/// Counter: reservations created.
pub const BOOKINGS_CREATED_TOTAL: &str = "roombook_bookings_created_total";

/// Counter: reservations cancelled.
pub const BOOKINGS_CANCELLED_TOTAL: &str = "roombook_bookings_cancelled_total";

/// Counter: rejected book/cancel calls. Labels: operation, reason.
pub const BOOKING_REJECTIONS_TOTAL: &str = "roombook_booking_rejections_total";

/// Gauge: reservations currently held.
pub const RESERVATIONS_ACTIVE: &str = "roombook_reservations_active";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Book,
    Cancel,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Book => "book",
            Operation::Cancel => "cancel",
        }
    }
}

pub fn record_rejection(op: Operation, err: &Error) {
    metrics::counter!(BOOKING_REJECTIONS_TOTAL, "operation" => op.as_str(), "reason" => err.kind())
        .increment(1);
    tracing::debug!(operation = op.as_str(), reason = err.kind(), "{err}");
}
