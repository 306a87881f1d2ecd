use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageUsers,
    ManageOrganizations,
    ManageFloors,
    ManageRooms,
    ManageBookings,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ManageUsers => "manage_users",
            Permission::ManageOrganizations => "manage_organizations",
            Permission::ManageFloors => "manage_floors",
            Permission::ManageRooms => "manage_rooms",
            Permission::ManageBookings => "manage_bookings",
        }
    }
}

/// Capabilities held by a principal. Holding a permission is the grant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    /// Admins manage the building and its tenants. They do not get
    /// `ManageBookings`: an admin books rooms only after an explicit grant.
    pub fn admin() -> Self {
        [
            Permission::ManageUsers,
            Permission::ManageOrganizations,
            Permission::ManageFloors,
            Permission::ManageRooms,
        ]
        .into_iter()
        .collect()
    }

    pub fn member() -> Self {
        [Permission::ManageBookings].into_iter().collect()
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    /// Returns false if the permission was already held.
    pub fn grant(&mut self, permission: Permission) -> bool {
        self.0.insert(permission)
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ── Decisions ────────────────────────────────────────────────────
// An unknown principal is always denied.

pub fn allows(principal: Option<&User>, permission: Permission) -> bool {
    principal.is_some_and(|user| user.permissions.contains(permission))
}

pub fn can_manage_users(principal: Option<&User>) -> bool {
    allows(principal, Permission::ManageUsers)
}

pub fn can_manage_organizations(principal: Option<&User>) -> bool {
    allows(principal, Permission::ManageOrganizations)
}

pub fn can_manage_floors(principal: Option<&User>) -> bool {
    allows(principal, Permission::ManageFloors)
}

pub fn can_manage_rooms(principal: Option<&User>) -> bool {
    allows(principal, Permission::ManageRooms)
}

pub fn can_manage_bookings(principal: Option<&User>) -> bool {
    allows(principal, Permission::ManageBookings)
}
