//! # Roles
//!
//! Every access grant carries exactly one [`Role`]. Roles are totally ordered:
//!
//! | role   | ordinal |
//! |--------|---------|
//! | owner  | 4       |
//! | admin  | 3       |
//! | editor | 2       |
//! | viewer | 1       |
//!
//! A requirement is met when the held role's ordinal is at least the required
//! one, see [`Role::meets_minimum`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The role a user holds on a dataroom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Created with the dataroom. Can delete it. Never changed or revoked.
    Owner,
    /// Can manage who has access.
    Admin,
    /// Can create, rename, upload and delete content.
    Editor,
    /// Read-only.
    Viewer,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Owner, Role::Admin, Role::Editor, Role::Viewer];

    pub fn ordinal(&self) -> u8 {
        match self {
            Role::Owner => 4,
            Role::Admin => 3,
            Role::Editor => 2,
            Role::Viewer => 1,
        }
    }

    /// True iff `self` is at least as privileged as `required`.
    pub fn meets_minimum(&self, required: Role) -> bool {
        self.ordinal() >= required.ordinal()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Viewer => "viewer",
        }
    }

    /// Whether this role may be handed out by invitation or role change.
    pub fn is_grantable(&self) -> bool {
        !matches!(self, Role::Owner)
    }

    /// Human readable list of what the role allows, used in invitation notices.
    pub fn capabilities(&self) -> &'static [&'static str] {
        match self {
            Role::Owner => &[
                "View all files and folders",
                "Edit and upload files",
                "Manage user access",
                "Delete the dataroom",
            ],
            Role::Admin => &[
                "View all files and folders",
                "Edit and upload files",
                "Manage user access",
            ],
            Role::Editor => &["View all files and folders", "Edit and upload files"],
            Role::Viewer => &["View all files and folders"],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "owner" => Ok(Role::Owner),
            "admin" => Ok(Role::Admin),
            "editor" => Ok(Role::Editor),
            "viewer" => Ok(Role::Viewer),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meets_minimum_matches_ordinals() {
        for actual in Role::ALL {
            for required in Role::ALL {
                assert_eq!(
                    actual.meets_minimum(required),
                    actual.ordinal() >= required.ordinal(),
                    "{actual} vs {required}"
                );
            }
        }
    }

    #[test]
    fn test_owner_meets_everything() {
        assert!(Role::ALL.iter().all(|r| Role::Owner.meets_minimum(*r)));
    }

    #[test]
    fn test_viewer_meets_only_viewer() {
        let met: Vec<Role> = Role::ALL
            .into_iter()
            .filter(|r| Role::Viewer.meets_minimum(*r))
            .collect();
        assert_eq!(met, vec![Role::Viewer]);
    }

    #[test]
    fn test_parse_round_trip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Editor).unwrap(), "\"editor\"");
        let role: Role = serde_json::from_str("\"viewer\"").unwrap();
        assert_eq!(role, Role::Viewer);
    }

    #[test]
    fn test_owner_not_grantable() {
        assert!(!Role::Owner.is_grantable());
        assert!(Role::Admin.is_grantable());
    }
}
