use std::collections::{HashMap, HashSet};

use crate::error::{Entity, Error, Result};
use crate::model::*;

/// Reservation table plus everything derived from it. `insert` and `remove`
/// are the only mutators, so the indexes and usage counters can never drift
/// from the primary table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingStore {
    reservations: HashMap<ReservationKey, Reservation>,
    by_user: HashMap<String, HashSet<ReservationKey>>,
    by_organization: HashMap<String, HashSet<ReservationKey>>,
    usage: HashMap<UsageKey, u32>,
}

impl BookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }

    pub fn get(&self, key: &ReservationKey) -> Option<&Reservation> {
        self.reservations.get(key)
    }

    pub fn all(&self) -> Vec<Reservation> {
        let mut out: Vec<Reservation> = self.reservations.values().cloned().collect();
        out.sort_by_key(Reservation::key);
        out
    }

    // ── Usage counters ───────────────────────────────────────────

    pub fn usage(&self, organization: &str, month: YearMonth) -> u32 {
        let key = UsageKey { organization: organization.to_string(), month };
        self.usage.get(&key).copied().unwrap_or(0)
    }

    // ── Transactional mutators ───────────────────────────────────

    /// Record a booking, index it under its user and organization, and count
    /// it against the organization's usage for `month`.
    pub fn insert(&mut self, reservation: Reservation, month: YearMonth) -> Result<()> {
        let key = reservation.key();
        if self.reservations.contains_key(&key) {
            return Err(Error::Conflict(Entity::Booking));
        }
        self.by_user
            .entry(reservation.user.clone())
            .or_default()
            .insert(key.clone());
        self.by_organization
            .entry(reservation.organization.clone())
            .or_default()
            .insert(key.clone());
        *self
            .usage
            .entry(UsageKey { organization: reservation.organization.clone(), month })
            .or_insert(0) += 1;
        self.reservations.insert(key, reservation);
        Ok(())
    }

    /// Inverse of `insert`. The usage counter for `month` never drops below 0.
    pub fn remove(&mut self, key: &ReservationKey, month: YearMonth) -> Option<Reservation> {
        let reservation = self.reservations.remove(key)?;
        unindex(&mut self.by_user, &reservation.user, key);
        unindex(&mut self.by_organization, &reservation.organization, key);
        let usage_key = UsageKey { organization: reservation.organization.clone(), month };
        if let Some(count) = self.usage.get_mut(&usage_key) {
            *count = count.saturating_sub(1);
        }
        Some(reservation)
    }

    // ── Index walks ──────────────────────────────────────────────

    pub fn for_user(&self, user: &str) -> Vec<Reservation> {
        self.collect(self.by_user.get(user))
    }

    pub fn for_organization(&self, organization: &str) -> Vec<Reservation> {
        self.collect(self.by_organization.get(organization))
    }

    fn collect(&self, bucket: Option<&HashSet<ReservationKey>>) -> Vec<Reservation> {
        let Some(keys) = bucket else { return Vec::new() };
        let mut out: Vec<Reservation> = keys
            .iter()
            .filter_map(|k| self.reservations.get(k))
            .cloned()
            .collect();
        out.sort_by_key(Reservation::key);
        out
    }

    /// Panics unless every reservation sits in exactly one user bucket and
    /// one organization bucket, and no bucket lists a missing reservation.
    #[cfg(test)]
    pub fn assert_consistent(&self) {
        for (key, r) in &self.reservations {
            let user_hits = self.by_user.values().filter(|b| b.contains(key)).count();
            let org_hits = self.by_organization.values().filter(|b| b.contains(key)).count();
            assert_eq!(user_hits, 1, "{key} in {user_hits} user buckets");
            assert_eq!(org_hits, 1, "{key} in {org_hits} organization buckets");
            assert!(self.by_user[&r.user].contains(key));
            assert!(self.by_organization[&r.organization].contains(key));
        }
        for bucket in self.by_user.values().chain(self.by_organization.values()) {
            for key in bucket {
                assert!(self.reservations.contains_key(key), "dangling index entry {key}");
            }
        }
    }
}

fn unindex(index: &mut HashMap<String, HashSet<ReservationKey>>, owner: &str, key: &ReservationKey) {
    if let Some(bucket) = index.get_mut(owner) {
        bucket.remove(key);
        if bucket.is_empty() {
            index.remove(owner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn jan() -> YearMonth {
        YearMonth { year: 2030, month: 1 }
    }

    fn reservation(room: &str, hour: u8, user: &str, org: &str) -> Reservation {
        let date = BookingDate::parse("10-01-2030").unwrap();
        Reservation {
            room: room.into(),
            date,
            slot: Slot::new(hour, hour + 1).unwrap(),
            user: user.into(),
            organization: org.into(),
            booked_at: NaiveDate::from_ymd_opt(2030, 1, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn insert_indexes_and_counts() {
        let mut store = BookingStore::new();
        store.insert(reservation("A1", 9, "a@x.com", "Acme"), jan()).unwrap();
        store.insert(reservation("A1", 10, "b@x.com", "Acme"), jan()).unwrap();
        store.insert(reservation("A2", 9, "c@y.com", "Beta"), jan()).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.for_user("a@x.com").len(), 1);
        assert_eq!(store.for_organization("Acme").len(), 2);
        assert_eq!(store.usage("Acme", jan()), 2);
        assert_eq!(store.usage("Beta", jan()), 1);
        assert_eq!(store.usage("Acme", YearMonth { year: 2030, month: 2 }), 0);
        store.assert_consistent();
    }

    #[test]
    fn duplicate_key_leaves_store_untouched() {
        let mut store = BookingStore::new();
        store.insert(reservation("A1", 9, "a@x.com", "Acme"), jan()).unwrap();
        let before = store.clone();
        let err = store
            .insert(reservation("A1", 9, "c@y.com", "Beta"), jan())
            .unwrap_err();
        assert_eq!(err, Error::Conflict(Entity::Booking));
        assert_eq!(store, before);
    }

    #[test]
    fn remove_clears_indexes() {
        let mut store = BookingStore::new();
        let r = reservation("A1", 9, "a@x.com", "Acme");
        let key = r.key();
        store.insert(r.clone(), jan()).unwrap();

        assert_eq!(store.remove(&key, jan()), Some(r));
        assert!(store.is_empty());
        assert!(store.for_user("a@x.com").is_empty());
        assert!(store.for_organization("Acme").is_empty());
        assert_eq!(store.usage("Acme", jan()), 0);
        assert_eq!(store.remove(&key, jan()), None);
        store.assert_consistent();
    }

    #[test]
    fn usage_never_goes_negative() {
        let mut store = BookingStore::new();
        let r = reservation("A1", 9, "a@x.com", "Acme");
        let key = r.key();
        store.insert(r, jan()).unwrap();
        // Cancelled in a later month: that month's counter stays at zero.
        let feb = YearMonth { year: 2030, month: 2 };
        store.remove(&key, feb).unwrap();
        assert_eq!(store.usage("Acme", feb), 0);
        assert_eq!(store.usage("Acme", jan()), 1);
    }

    #[test]
    fn index_walks_are_sorted() {
        let mut store = BookingStore::new();
        store.insert(reservation("B1", 9, "a@x.com", "Acme"), jan()).unwrap();
        store.insert(reservation("A1", 11, "a@x.com", "Acme"), jan()).unwrap();
        store.insert(reservation("A1", 9, "a@x.com", "Acme"), jan()).unwrap();
        let rooms: Vec<_> = store
            .for_user("a@x.com")
            .into_iter()
            .map(|r| (r.room, r.slot.start_hour()))
            .collect();
        assert_eq!(rooms, vec![
            ("A1".to_string(), 9u8),
            ("A1".to_string(), 11),
            ("B1".to_string(), 9),
        ]);
    }
}
