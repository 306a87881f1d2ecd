use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info};
use ulid::Ulid;

use crate::auth;
use crate::directory::Directory;
use crate::error::{Entity, Error, Result};
use crate::limits::MAX_NAME_LEN;
use crate::model::{Floor, Room};

/// Physical inventory: floors and the rooms attached to them.
pub struct SpaceRegistry {
    directory: Arc<Directory>,
    floors: DashMap<u32, Floor>,
    rooms: DashMap<String, Room>,
    /// Floor number → room names on that floor.
    floor_rooms: DashMap<u32, Vec<String>>,
}

impl SpaceRegistry {
    pub fn new(directory: Arc<Directory>) -> Self {
        Self {
            directory,
            floors: DashMap::new(),
            rooms: DashMap::new(),
            floor_rooms: DashMap::new(),
        }
    }

    // ── Floors ───────────────────────────────────────────────────

    /// `room_capacity_hint` seeds the floor's room count.
    pub fn create_floor(&self, requestor: &str, number: u32, room_capacity_hint: u32) -> Result<Floor> {
        if !auth::can_manage_floors(self.directory.principal(requestor).as_ref()) {
            debug!(requestor, "floor creation denied");
            return Err(Error::Forbidden("create floor"));
        }
        let floor = Floor {
            id: Ulid::new(),
            number,
            rooms_count: room_capacity_hint,
        };
        match self.floors.entry(number) {
            Entry::Occupied(_) => return Err(Error::Conflict(Entity::Floor)),
            Entry::Vacant(slot) => {
                slot.insert(floor.clone());
            }
        }
        self.floor_rooms.entry(number).or_default();
        info!(floor = number, "floor created");
        Ok(floor)
    }

    pub fn get_floor(&self, number: u32) -> Option<Floor> {
        self.floors.get(&number).map(|e| e.value().clone())
    }

    pub fn list_floors(&self) -> Vec<Floor> {
        let mut floors: Vec<Floor> = self.floors.iter().map(|e| e.value().clone()).collect();
        floors.sort_by_key(|f| f.number);
        floors
    }

    pub fn rooms_on_floor(&self, number: u32) -> Result<Vec<String>> {
        if !self.floors.contains_key(&number) {
            return Err(Error::NotFound(Entity::Floor));
        }
        Ok(self
            .floor_rooms
            .get(&number)
            .map(|e| e.value().clone())
            .unwrap_or_default())
    }

    // ── Rooms ────────────────────────────────────────────────────

    pub fn create_room(
        &self,
        requestor: &str,
        name: &str,
        floor: u32,
        capacity: u32,
        has_projector: bool,
        details: serde_json::Value,
    ) -> Result<Room> {
        if !auth::can_manage_rooms(self.directory.principal(requestor).as_ref()) {
            debug!(requestor, "room creation denied");
            return Err(Error::Forbidden("create room"));
        }
        if name.is_empty() {
            return Err(Error::RequiredParameter("room name"));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(Error::LimitExceeded("room name too long"));
        }
        // Room names are unique across the building, not per floor.
        if self.rooms.contains_key(name) {
            return Err(Error::Conflict(Entity::Room));
        }
        if !self.floors.contains_key(&floor) {
            return Err(Error::NotFound(Entity::Floor));
        }

        let room = Room {
            id: Ulid::new(),
            name: name.to_string(),
            floor,
            capacity,
            has_projector,
            is_available: true,
            details,
        };
        match self.rooms.entry(name.to_string()) {
            Entry::Occupied(_) => return Err(Error::Conflict(Entity::Room)),
            Entry::Vacant(slot) => {
                slot.insert(room.clone());
            }
        }
        self.attach_room(floor, name);
        info!(room = name, floor, capacity, "room created");
        Ok(room)
    }

    fn attach_room(&self, floor: u32, name: &str) {
        self.floor_rooms
            .entry(floor)
            .or_default()
            .push(name.to_string());
        if let Some(mut f) = self.floors.get_mut(&floor) {
            f.rooms_count += 1;
        }
    }

    pub fn get_room(&self, name: &str) -> Result<Option<Room>> {
        if name.is_empty() {
            return Err(Error::RequiredParameter("room name"));
        }
        Ok(self.rooms.get(name).map(|e| e.value().clone()))
    }

    /// Rooms passing every supplied filter, sorted by name.
    pub fn list_rooms(&self, min_capacity: Option<u32>, require_projector: Option<bool>) -> Vec<Room> {
        let mut rooms: Vec<Room> = self
            .rooms
            .iter()
            .filter(|e| min_capacity.is_none_or(|min| e.capacity >= min))
            .filter(|e| !require_projector.unwrap_or(false) || e.has_projector)
            .map(|e| e.value().clone())
            .collect();
        rooms.sort_by(|a, b| a.name.cmp(&b.name));
        rooms
    }
}
