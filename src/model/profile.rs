use std::fmt;

use itertools::Itertools;
use rocket_okapi::okapi::schemars::{self, gen::SchemaGenerator, schema::Schema, JsonSchema};
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RoleError {
    #[error("Unknown role: \"{0}\"")]
    Unknown(String),
}

/// Access level of a profile. Every role comparison goes through [`Role::parse`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    #[default]
    User,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Accepts the spellings found in the profiles table: `User`, `admin`,
    /// `Super Admin`, `super_admin`, `SUPER-ADMIN`, ...
    pub fn parse(raw: &str) -> Result<Self, RoleError> {
        let normalized = raw
            .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
            .filter(|part| !part.is_empty())
            .map(str::to_lowercase)
            .join("_");
        match normalized.as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            "super_admin" | "superadmin" => Ok(Self::SuperAdmin),
            _ => Err(RoleError::Unknown(raw.to_owned())),
        }
    }

    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }

    pub const fn is_super_admin(self) -> bool {
        matches!(self, Self::SuperAdmin)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Admin => "Admin",
            Self::SuperAdmin => "Super Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for Role {
    type Error = RoleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.label().to_owned()
    }
}

impl JsonSchema for Role {
    fn schema_name() -> String {
        "Role".to_owned()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub role: Role,
    pub handicap_index: Option<f64>,
    pub home_club: Option<String>,
    #[serde(default)]
    pub approval_status: ApprovalStatus,
}

impl Profile {
    pub const UNKNOWN_NAME: &'static str = "Unknown Player";

    pub fn display_name(&self) -> &str {
        let name = self.full_name.trim();
        if name.is_empty() {
            Self::UNKNOWN_NAME
        } else {
            name
        }
    }

    pub fn home_club(&self) -> Option<&str> {
        self.home_club
            .as_deref()
            .map(str::trim)
            .filter(|club| !club.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_spellings() {
        assert_eq!(Role::parse("User"), Ok(Role::User));
        assert_eq!(Role::parse(" ADMIN "), Ok(Role::Admin));
        assert_eq!(Role::parse("Super Admin"), Ok(Role::SuperAdmin));
        assert_eq!(Role::parse("super_admin"), Ok(Role::SuperAdmin));
        assert_eq!(Role::parse("super  admin"), Ok(Role::SuperAdmin));
        assert_eq!(Role::parse("SuperAdmin"), Ok(Role::SuperAdmin));
        assert_eq!(
            Role::parse("captain"),
            Err(RoleError::Unknown("captain".to_owned()))
        );
    }

    #[test]
    fn admin_levels() {
        assert!(!Role::User.is_admin());
        assert!(Role::Admin.is_admin());
        assert!(Role::SuperAdmin.is_admin());
        assert!(!Role::Admin.is_super_admin());
    }

    #[test]
    fn profile_from_store_json() {
        let profile: Profile = serde_json::from_value(json!({
            "id": "p1",
            "fullName": "  ",
            "role": "Super Admin",
            "handicapIndex": 12.4,
            "homeClub": "Portmarnock",
            "approvalStatus": "approved"
        }))
        .unwrap();
        assert_eq!(profile.role, Role::SuperAdmin);
        assert_eq!(profile.display_name(), Profile::UNKNOWN_NAME);
        assert_eq!(profile.approval_status, ApprovalStatus::Approved);
        assert_eq!(
            serde_json::to_value(profile.role).unwrap(),
            json!("Super Admin")
        );
    }

    #[test]
    fn unknown_role_is_rejected() {
        let profile = serde_json::from_value::<Profile>(json!({
            "id": "p1",
            "role": "greenkeeper"
        }));
        assert!(profile.is_err());
    }
}
