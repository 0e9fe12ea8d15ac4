//! Role catalogue and permission gating.
//!
//! Roles are static reference data: the directory never creates, updates, or
//! deletes them. Permission strings follow the `resource:verb` convention.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserRecord;

/// Permission required to remove records from the directory.
pub const PERM_USERS_DELETE: &str = "users:delete";

/// Role identifier granted unrestricted dashboard access.
pub const ADMIN_ROLE: &str = "admin";

/// A named permission set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// Stable role identifier referenced by [`UserRecord::role`].
    pub id: String,
    /// Human-readable display name.
    pub name: String,
    /// Permission strings, most privileged first.
    pub permissions: Vec<String>,
}

impl Role {
    fn new(id: &str, name: &str, permissions: &[&str]) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            permissions: permissions.iter().map(|p| (*p).into()).collect(),
        }
    }

    /// Whether this role grants `permission`.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

static CATALOGUE: OnceLock<Vec<Role>> = OnceLock::new();

/// The built-in role catalogue.
#[must_use]
pub fn catalogue() -> &'static [Role] {
    CATALOGUE.get_or_init(|| {
        vec![
            Role::new(
                ADMIN_ROLE,
                "Administrator",
                &[
                    "users:read",
                    "users:write",
                    "users:delete",
                    "settings:read",
                    "settings:write",
                    "reports:read",
                    "reports:write",
                ],
            ),
            Role::new(
                "manager",
                "Manager",
                &["users:read", "users:write", "reports:read", "reports:write"],
            ),
            Role::new("user", "Regular User", &["users:read", "reports:read"]),
            Role::new("guest", "Guest", &["users:read"]),
        ]
    })
}

/// Look up a role by identifier.
#[must_use]
pub fn find_role(id: &str) -> Option<&'static Role> {
    catalogue().iter().find(|role| role.id == id)
}

/// Whether a user holding `actor_role` may delete `target`.
///
/// Records whose role is `admin` cannot be deleted from the dashboard at
/// all; for everything else the actor needs the `users:delete` permission.
#[must_use]
pub fn can_delete_user(actor_role: &str, target: &UserRecord) -> bool {
    if target.role == ADMIN_ROLE {
        return false;
    }
    find_role(actor_role).is_some_and(|role| role.has_permission(PERM_USERS_DELETE))
}
