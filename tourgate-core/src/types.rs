//! Core data type definitions

use crate::rbac::{resolve_permissions, Permission, Role};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A verified admin-panel user.
///
/// Created by the identity provider and read-only to this layer. The
/// permission set is always derived from the role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Provider-assigned unique identifier
    pub id: String,
    pub email: String,
    /// `None` when the provider assigned a role this layer does not know
    pub role: Option<Role>,
    pub permissions: BTreeSet<Permission>,
}

impl User {
    /// Build a user whose permissions are resolved from its role
    pub fn new(id: impl Into<String>, email: impl Into<String>, role: Option<Role>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            role,
            permissions: resolve_permissions(role),
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// True when every permission in `required` is held
    pub fn has_all(&self, required: &[Permission]) -> bool {
        required.iter().all(|p| self.permissions.contains(p))
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }
}
