//! The fixed set of cities served by the directory.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use directory_core::AppError;

/// A city a business can be listed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "location_id", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Location {
    /// McAllen, TX.
    McAllen,
    /// Mission, TX.
    Mission,
    /// Edinburg, TX.
    Edinburg,
    /// Pharr, TX.
    Pharr,
    /// Weslaco, TX.
    Weslaco,
    /// Harlingen, TX.
    Harlingen,
    /// Brownsville, TX.
    Brownsville,
}

impl Location {
    /// Every location, in display order.
    pub const ALL: [Location; 7] = [
        Self::McAllen,
        Self::Mission,
        Self::Edinburg,
        Self::Pharr,
        Self::Weslaco,
        Self::Harlingen,
        Self::Brownsville,
    ];

    /// Stable identifier used in URLs and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::McAllen => "mcallen",
            Self::Mission => "mission",
            Self::Edinburg => "edinburg",
            Self::Pharr => "pharr",
            Self::Weslaco => "weslaco",
            Self::Harlingen => "harlingen",
            Self::Brownsville => "brownsville",
        }
    }

    /// Human-readable city name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::McAllen => "McAllen",
            Self::Mission => "Mission",
            Self::Edinburg => "Edinburg",
            Self::Pharr => "Pharr",
            Self::Weslaco => "Weslaco",
            Self::Harlingen => "Harlingen",
            Self::Brownsville => "Brownsville",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|l| l.as_str() == wanted)
            .ok_or_else(|| AppError::validation(format!("Unknown location: '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("McAllen".parse::<Location>().unwrap(), Location::McAllen);
        assert_eq!(" pharr ".parse::<Location>().unwrap(), Location::Pharr);
        assert!("austin".parse::<Location>().is_err());
    }

    #[test]
    fn test_serde_uses_identifier() {
        let json = serde_json::to_string(&Location::McAllen).unwrap();
        assert_eq!(json, "\"mcallen\"");
    }
}
