//! User and role models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use prime_drip_core::{Email, UserId};

/// A registered user.
///
/// The password hash is deliberately not part of this struct; it only travels
/// through the credential-verification path in the auth service.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// The closed set of roles a user can hold.
///
/// Roles travel on the wire (JSON bodies and JWT claims) under their
/// authority names, `ROLE_USER` and `ROLE_ADMIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ROLE_USER")]
    User,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl Role {
    /// The authority name stored in the database and embedded in tokens.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "ROLE_USER",
            Self::Admin => "ROLE_ADMIN",
        }
    }

    /// Parse an authority name back into a role.
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "ROLE_USER" => Some(Self::User),
            "ROLE_ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ROLE_ADMIN\"");
        let role: Role = serde_json::from_str("\"ROLE_USER\"").unwrap();
        assert_eq!(role, Role::User);
    }

    #[test]
    fn test_role_from_str_rejects_unknown() {
        assert_eq!(Role::from_str_opt("ROLE_ADMIN"), Some(Role::Admin));
        assert_eq!(Role::from_str_opt("ROLE_ROOT"), None);
    }
}
