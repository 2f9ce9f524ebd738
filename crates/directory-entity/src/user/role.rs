//! User role enumeration.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Roles a user can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular directory visitor.
    User,
    /// Owns one or more businesses.
    BusinessOwner,
    /// Platform administrator.
    Admin,
}

impl UserRole {
    /// Return the role as its wire identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::BusinessOwner => "business_owner",
            Self::Admin => "admin",
        }
    }

    /// Read the role stored in identity-provider public metadata,
    /// falling back to [`UserRole::User`].
    pub fn from_metadata(metadata: &Value) -> Self {
        metadata
            .get("role")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or(Self::User)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_metadata() {
        let meta = serde_json::json!({"role": "business_owner"});
        assert_eq!(UserRole::from_metadata(&meta), UserRole::BusinessOwner);
        assert_eq!(UserRole::from_metadata(&Value::Null), UserRole::User);
        let junk = serde_json::json!({"role": "overlord"});
        assert_eq!(UserRole::from_metadata(&junk), UserRole::User);
    }
}
