//! User roles.

use serde::{Deserialize, Serialize};

/// Authorization role attached to every account.
///
/// New accounts start as [`UserRole::User`]; operators promote staff with
/// `bistro-cli user promote`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Customer account.
    #[default]
    User,
    /// Staff account with access to `/admin`.
    Admin,
}

impl UserRole {
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "USER"),
            Self::Admin => write!(f, "ADMIN"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_strings() {
        assert_eq!("admin".parse::<UserRole>(), Ok(UserRole::Admin));
        assert_eq!("USER".parse::<UserRole>(), Ok(UserRole::User));
        assert_eq!(UserRole::Admin.to_string(), "ADMIN");
        assert!("owner".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_serde_screaming_case() {
        let json = serde_json::to_string(&UserRole::Admin).expect("serialize");
        assert_eq!(json, "\"ADMIN\"");
    }
}
