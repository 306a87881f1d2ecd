use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::auth;
use crate::directory::normalize_email;
use crate::error::{Entity, Error, Result};
use crate::model::*;
use crate::observability::{self, Operation};

use super::guards::{check_cancel_window, check_quota};
use super::{now_local, BookingEngine};

impl BookingEngine {
    /// Reserve `room` for `slot` on `date` (today when `None`).
    pub async fn book_room(
        &self,
        requestor: &str,
        room: &str,
        slot: Slot,
        date: Option<BookingDate>,
    ) -> Result<Reservation> {
        self.book_room_at(requestor, room, slot, date, now_local()).await
    }

    /// `book_room` against an explicit clock reading.
    pub async fn book_room_at(
        &self,
        requestor: &str,
        room: &str,
        slot: Slot,
        date: Option<BookingDate>,
        now: NaiveDateTime,
    ) -> Result<Reservation> {
        let result = self.try_book(requestor, room, slot, date, now).await;
        match &result {
            Ok(r) => {
                metrics::counter!(observability::BOOKINGS_CREATED_TOTAL).increment(1);
                info!(room = %r.room, date = %r.date, slot = %r.slot, user = %r.user, "room booked");
            }
            Err(e) => {
                if let Error::QuotaExceeded { organization, limit } = e {
                    warn!(organization = %organization, limit, "monthly booking quota exhausted");
                }
                observability::record_rejection(Operation::Book, e);
            }
        }
        result
    }

    async fn try_book(
        &self,
        requestor: &str,
        room: &str,
        slot: Slot,
        date: Option<BookingDate>,
        now: NaiveDateTime,
    ) -> Result<Reservation> {
        let principal = self.directory.principal(requestor);
        if !auth::can_manage_bookings(principal.as_ref()) {
            return Err(Error::Forbidden("create booking"));
        }
        let user = principal.ok_or(Error::NotFound(Entity::User))?;
        // Only members belong to an organization; a granted admin has none to bill.
        let organization = user
            .organization
            .clone()
            .ok_or(Error::NotFound(Entity::Organization))?;
        let room = self
            .spaces
            .get_room(room)?
            .ok_or(Error::NotFound(Entity::Room))?;

        let month = YearMonth::of(now);
        let reservation = Reservation {
            room: room.name,
            date: date.unwrap_or_else(|| BookingDate::of(now)),
            slot,
            user: user.email,
            organization,
            booked_at: now,
        };

        let mut store = self.store.write().await;
        check_quota(
            store.usage(&reservation.organization, month),
            self.policy.monthly_quota_hours,
            &reservation.organization,
        )?;
        store.insert(reservation.clone(), month)?;
        metrics::gauge!(observability::RESERVATIONS_ACTIVE).set(store.len() as f64);
        Ok(reservation)
    }

    /// Cancel the requestor's own booking of `room`/`slot` on `date`
    /// (today when `None`). Ownership, not permission, gates cancellation.
    pub async fn cancel_room_booking(
        &self,
        requestor: &str,
        room: &str,
        slot: Slot,
        date: Option<BookingDate>,
    ) -> Result<Reservation> {
        self.cancel_room_booking_at(requestor, room, slot, date, now_local())
            .await
    }

    /// `cancel_room_booking` against an explicit clock reading.
    pub async fn cancel_room_booking_at(
        &self,
        requestor: &str,
        room: &str,
        slot: Slot,
        date: Option<BookingDate>,
        now: NaiveDateTime,
    ) -> Result<Reservation> {
        let result = self.try_cancel(requestor, room, slot, date, now).await;
        match &result {
            Ok(r) => {
                metrics::counter!(observability::BOOKINGS_CANCELLED_TOTAL).increment(1);
                info!(room = %r.room, date = %r.date, slot = %r.slot, user = %r.user, "booking cancelled");
            }
            Err(e) => observability::record_rejection(Operation::Cancel, e),
        }
        result
    }

    async fn try_cancel(
        &self,
        requestor: &str,
        room: &str,
        slot: Slot,
        date: Option<BookingDate>,
        now: NaiveDateTime,
    ) -> Result<Reservation> {
        let requestor = normalize_email(requestor)?;
        let key = ReservationKey::new(room, date.unwrap_or_else(|| BookingDate::of(now)), slot);

        let mut store = self.store.write().await;
        let reservation = store
            .get(&key)
            .cloned()
            .ok_or(Error::NotFound(Entity::Booking))?;
        if reservation.user != requestor {
            return Err(Error::Forbidden("cancel this booking"));
        }
        if self.directory.principal(&requestor).is_none() {
            return Err(Error::NotFound(Entity::User));
        }
        check_cancel_window(&reservation, now, self.policy.cancel_cutoff)?;

        let removed = store
            .remove(&key, YearMonth::of(now))
            .ok_or(Error::NotFound(Entity::Booking))?;
        metrics::gauge!(observability::RESERVATIONS_ACTIVE).set(store.len() as f64);
        Ok(removed)
    }
}
