use std::collections::BTreeSet;

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info};
use ulid::Ulid;

use crate::auth::{self, Permission, PermissionSet};
use crate::error::{Entity, Error, Result};
use crate::limits::*;
use crate::model::{Organization, Role, User};

/// Lowercases and trims an email so every lookup and insert agrees on the key.
pub fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim();
    if email.is_empty() {
        return Err(Error::RequiredParameter("email"));
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(Error::LimitExceeded("email too long"));
    }
    Ok(email.to_lowercase())
}

fn check_name(name: &str, what: &'static str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::RequiredParameter(what));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(Error::LimitExceeded("name too long"));
    }
    Ok(())
}

/// Users, organizations and who belongs where.
pub struct Directory {
    users: DashMap<String, User>,
    organizations: DashMap<String, Organization>,
    /// Organization name → member emails.
    members: DashMap<String, BTreeSet<String>>,
}

impl Default for Directory {
    fn default() -> Self {
        Self::new()
    }
}

impl Directory {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            organizations: DashMap::new(),
            members: DashMap::new(),
        }
    }

    /// Resolve a requestor for an authorization decision. Anything that does
    /// not name a registered user resolves to `None`.
    pub fn principal(&self, email: &str) -> Option<User> {
        let email = normalize_email(email).ok()?;
        self.users.get(&email).map(|e| e.value().clone())
    }

    // ── Users ────────────────────────────────────────────────────

    pub fn register_admin(&self, email: &str, name: &str) -> Result<User> {
        let email = normalize_email(email)?;
        check_name(name, "name")?;

        let user = User {
            id: Ulid::new(),
            email: email.clone(),
            name: name.to_string(),
            role: Role::Admin,
            permissions: PermissionSet::admin(),
            organization: None,
        };
        match self.users.entry(email) {
            Entry::Occupied(_) => Err(Error::Conflict(Entity::User)),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                info!(email = %user.email, "admin registered");
                Ok(user)
            }
        }
    }

    pub fn register_user(
        &self,
        requestor: &str,
        email: &str,
        name: &str,
        organization: &str,
    ) -> Result<User> {
        let email = normalize_email(email)?;
        check_name(name, "name")?;

        if !auth::can_manage_users(self.principal(requestor).as_ref()) {
            debug!(requestor, "user registration denied");
            return Err(Error::Forbidden("create user"));
        }
        if self.users.contains_key(&email) {
            return Err(Error::Conflict(Entity::User));
        }
        if !self.organizations.contains_key(organization) {
            return Err(Error::NotFound(Entity::Organization));
        }

        let user = User {
            id: Ulid::new(),
            email: email.clone(),
            name: name.to_string(),
            role: Role::Member,
            permissions: PermissionSet::member(),
            organization: Some(organization.to_string()),
        };
        match self.users.entry(email.clone()) {
            Entry::Occupied(_) => return Err(Error::Conflict(Entity::User)),
            Entry::Vacant(slot) => {
                // Index the member before the user entry's shard lock drops.
                self.members
                    .entry(organization.to_string())
                    .or_default()
                    .insert(email);
                slot.insert(user.clone());
            }
        }
        info!(email = %user.email, organization, "user registered");
        Ok(user)
    }

    pub fn get_user(&self, email: &str) -> Result<Option<User>> {
        let email = normalize_email(email)?;
        Ok(self.users.get(&email).map(|e| e.value().clone()))
    }

    pub fn list_users(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.iter().map(|e| e.value().clone()).collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        users
    }

    /// Organization the user books under; `None` for admins.
    pub fn get_organization_of_user(&self, email: &str) -> Result<Option<String>> {
        let email = normalize_email(email)?;
        self.users
            .get(&email)
            .map(|e| e.value().organization.clone())
            .ok_or(Error::NotFound(Entity::User))
    }

    pub fn grant_permission(&self, requestor: &str, email: &str, permission: Permission) -> Result<()> {
        let email = normalize_email(email)?;
        if !auth::can_manage_users(self.principal(requestor).as_ref()) {
            return Err(Error::Forbidden("grant permissions"));
        }
        let mut user = self
            .users
            .get_mut(&email)
            .ok_or(Error::NotFound(Entity::User))?;
        if user.permissions.grant(permission) {
            info!(email = %email, permission = permission.as_str(), "permission granted");
        }
        Ok(())
    }

    // ── Organizations ────────────────────────────────────────────

    pub fn register_organization(
        &self,
        requestor: &str,
        name: &str,
        contact_info: &str,
        details: serde_json::Value,
    ) -> Result<Organization> {
        check_name(name, "organization name")?;
        if !auth::can_manage_organizations(self.principal(requestor).as_ref()) {
            debug!(requestor, "organization registration denied");
            return Err(Error::Forbidden("create organization"));
        }

        let org = Organization {
            id: Ulid::new(),
            name: name.to_string(),
            contact_info: contact_info.to_string(),
            details,
            created_at: Utc::now(),
        };
        match self.organizations.entry(name.to_string()) {
            Entry::Occupied(_) => return Err(Error::Conflict(Entity::Organization)),
            Entry::Vacant(slot) => {
                slot.insert(org.clone());
            }
        }
        self.members.entry(name.to_string()).or_default();
        info!(organization = name, "organization registered");
        Ok(org)
    }

    pub fn get_organization(&self, name: &str) -> Result<Option<Organization>> {
        if name.is_empty() {
            return Err(Error::RequiredParameter("organization name"));
        }
        Ok(self.organizations.get(name).map(|e| e.value().clone()))
    }

    pub fn list_organizations(&self) -> Vec<Organization> {
        let mut orgs: Vec<Organization> = self
            .organizations
            .iter()
            .map(|e| e.value().clone())
            .collect();
        orgs.sort_by(|a, b| a.name.cmp(&b.name));
        orgs
    }

    /// Member emails of an organization, sorted.
    pub fn members_of(&self, organization: &str) -> Result<Vec<String>> {
        if !self.organizations.contains_key(organization) {
            return Err(Error::NotFound(Entity::Organization));
        }
        Ok(self
            .members
            .get(organization)
            .map(|e| e.value().iter().cloned().collect())
            .unwrap_or_default())
    }
}
