//! Role and permission model
//!
//! Roles are ordered by privilege: every permission granted to a viewer is
//! also granted to an editor, and every editor permission to an admin.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Roles an identity provider may assign to an account
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Read-only access to the admin panel
    Viewer,
    /// Can edit excursions, transfers, blog posts and promotions
    Editor,
    /// Full access including account management
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::Editor => "editor",
            Role::Admin => "admin",
        }
    }

    /// All roles, least privileged first
    pub fn all() -> &'static [Role] {
        &[Role::Viewer, Role::Editor, Role::Admin]
    }

    /// Default permission set for this role
    pub fn permissions(&self) -> BTreeSet<Permission> {
        let mut permissions: BTreeSet<Permission> =
            [Permission::ReadContent, Permission::ViewAnalytics]
                .into_iter()
                .collect();

        if *self >= Role::Editor {
            permissions.insert(Permission::WriteContent);
        }

        if *self >= Role::Admin {
            permissions.insert(Permission::DeleteContent);
            permissions.insert(Permission::ManageUsers);
        }

        permissions
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "viewer" => Ok(Role::Viewer),
            "editor" => Ok(Role::Editor),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Operations a user may be allowed to perform
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// View content in the admin panel
    ReadContent,
    /// Create or edit content
    WriteContent,
    /// Remove content
    DeleteContent,
    /// Create and manage admin accounts
    ManageUsers,
    /// View traffic and booking analytics
    ViewAnalytics,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ReadContent => "read_content",
            Permission::WriteContent => "write_content",
            Permission::DeleteContent => "delete_content",
            Permission::ManageUsers => "manage_users",
            Permission::ViewAnalytics => "view_analytics",
        }
    }

    /// Human readable description of the roles that hold this permission,
    /// as reported in 403 responses
    pub fn required_role_label(&self) -> String {
        let roles: Vec<String> = Role::all()
            .iter()
            .rev()
            .filter(|role| role.permissions().contains(self))
            .map(|role| role.as_str().to_uppercase())
            .collect();
        roles.join(" or ")
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "read_content" => Ok(Permission::ReadContent),
            "write_content" => Ok(Permission::WriteContent),
            "delete_content" => Ok(Permission::DeleteContent),
            "manage_users" => Ok(Permission::ManageUsers),
            "view_analytics" => Ok(Permission::ViewAnalytics),
            _ => Err(format!("Unknown permission: {}", s)),
        }
    }
}

/// Resolve a (possibly unknown) role to its permission set.
///
/// `None` stands for a role name the provider sent that this layer does not
/// recognise; it grants nothing.
pub fn resolve_permissions(role: Option<Role>) -> BTreeSet<Permission> {
    role.map(|role| role.permissions()).unwrap_or_default()
}

/// Parse a role name leniently, mapping unknown names to `None`
pub fn parse_role(name: Option<&str>) -> Option<Role> {
    name.and_then(|name| name.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_hierarchy_is_nested() {
        let viewer = Role::Viewer.permissions();
        let editor = Role::Editor.permissions();
        let admin = Role::Admin.permissions();

        assert!(viewer.is_subset(&editor));
        assert!(editor.is_subset(&admin));
        assert_eq!(admin.len(), 5);
    }

    #[test]
    fn test_viewer_cannot_write() {
        let viewer = Role::Viewer.permissions();
        assert!(viewer.contains(&Permission::ReadContent));
        assert!(!viewer.contains(&Permission::WriteContent));
        assert!(!viewer.contains(&Permission::ManageUsers));
    }

    #[test]
    fn test_unknown_role_resolves_to_nothing() {
        assert!(resolve_permissions(None).is_empty());
        assert_eq!(parse_role(Some("superuser")), None);
        assert_eq!(parse_role(None), None);
    }

    #[test]
    fn test_role_parsing_is_case_insensitive() {
        assert_eq!(parse_role(Some("ADMIN")), Some(Role::Admin));
        assert_eq!(parse_role(Some(" Editor ")), Some(Role::Editor));
        assert_eq!("viewer".parse::<Role>(), Ok(Role::Viewer));
    }

    #[test]
    fn test_permission_round_trips_through_display() {
        for permission in Role::Admin.permissions() {
            let parsed: Permission = permission.to_string().parse().unwrap();
            assert_eq!(parsed, permission);
        }
    }

    #[test]
    fn test_required_role_labels() {
        assert_eq!(
            Permission::WriteContent.required_role_label(),
            "ADMIN or EDITOR"
        );
        assert_eq!(Permission::ManageUsers.required_role_label(), "ADMIN");
        assert_eq!(
            Permission::ReadContent.required_role_label(),
            "ADMIN or EDITOR or VIEWER"
        );
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&Permission::ManageUsers).unwrap(),
            "\"manage_users\""
        );
        assert_eq!(serde_json::to_string(&Role::Editor).unwrap(), "\"editor\"");
    }
}
