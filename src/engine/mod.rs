mod guards;
mod mutations;
mod queries;
mod store;

pub(crate) use store::BookingStore;

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tokio::sync::RwLock;

use crate::config::BookingPolicy;
use crate::directory::Directory;
use crate::space::SpaceRegistry;

/// Local wall-clock time; the building has a single time zone.
pub fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Owns every reservation and its derived state. Directory and space
/// registry are consulted read-only.
///
/// One write lock covers the whole check-then-write sequence of a booking or
/// cancellation, so the reservation table, both indexes and the usage
/// counters are only ever observed together.
pub struct BookingEngine {
    directory: Arc<Directory>,
    spaces: Arc<SpaceRegistry>,
    store: RwLock<BookingStore>,
    policy: BookingPolicy,
}

impl BookingEngine {
    pub fn new(directory: Arc<Directory>, spaces: Arc<SpaceRegistry>, policy: BookingPolicy) -> Self {
        Self {
            directory,
            spaces,
            store: RwLock::new(BookingStore::new()),
            policy,
        }
    }

    pub fn directory(&self) -> &Arc<Directory> {
        &self.directory
    }
}
