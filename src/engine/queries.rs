use crate::directory::normalize_email;
use crate::error::{Error, Result};
use crate::model::*;

use super::{now_local, BookingEngine};

impl BookingEngine {
    pub async fn get_booking(&self, key: &ReservationKey) -> Result<Option<Reservation>> {
        if key.room.is_empty() {
            return Err(Error::RequiredParameter("booking key"));
        }
        Ok(self.store.read().await.get(key).cloned())
    }

    pub async fn list_bookings(&self) -> Vec<Reservation> {
        self.store.read().await.all()
    }

    /// Bookings of one organization, named directly or through one of its
    /// users (the user wins when both are given). A non-empty `date_range` must
    /// hold exactly two bounds and is applied inclusively; an empty one filters
    /// nothing, same as `None`.
    pub async fn bookings_for_organization(
        &self,
        user: Option<&str>,
        organization: Option<&str>,
        date_range: Option<&[BookingDate]>,
    ) -> Result<Vec<Reservation>> {
        let range = date_range
            .filter(|bounds| !bounds.is_empty())
            .map(DateRange::from_bounds)
            .transpose()?;
        let organization = match (user, organization) {
            (Some(user), _) => match self.directory.get_organization_of_user(user)? {
                Some(org) => org,
                None => return Ok(Vec::new()),
            },
            (None, Some(org)) if !org.is_empty() => org.to_string(),
            _ => return Err(Error::RequiredParameter("user or organization")),
        };

        let mut bookings = self.store.read().await.for_organization(&organization);
        if let Some(range) = range {
            bookings.retain(|r| range.contains(&r.date));
        }
        Ok(bookings)
    }

    pub async fn bookings_for_user(&self, user: &str) -> Result<Vec<Reservation>> {
        let user = normalize_email(user)?;
        Ok(self.store.read().await.for_user(&user))
    }

    /// Booking hours the organization has used in the current month.
    pub async fn monthly_usage(&self, organization: &str) -> u32 {
        self.monthly_usage_in(organization, YearMonth::of(now_local()))
            .await
    }

    pub async fn monthly_usage_in(&self, organization: &str, month: YearMonth) -> u32 {
        self.store.read().await.usage(organization, month)
    }

    #[cfg(test)]
    pub(super) async fn snapshot(&self) -> super::BookingStore {
        self.store.read().await.clone()
    }
}
