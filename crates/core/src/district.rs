//! City districts a user can be affiliated with.
//!
//! The string codes are the persisted and wire representation; they must
//! match the `ck_users_district` constraint.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum District {
    Sovietsky,
    Kirovsky,
    Leninsky,
}

impl District {
    pub const ALL: [District; 3] = [District::Sovietsky, District::Kirovsky, District::Leninsky];

    pub fn as_str(self) -> &'static str {
        match self {
            District::Sovietsky => "Sovietsky",
            District::Kirovsky => "Kirovsky",
            District::Leninsky => "Leninsky",
        }
    }

    /// Human-readable name as shown to residents.
    pub fn display_name(self) -> &'static str {
        match self {
            District::Sovietsky => "Советский",
            District::Kirovsky => "Кировский",
            District::Leninsky => "Ленинский",
        }
    }
}

impl fmt::Display for District {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for District {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        District::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid district '{s}'. Must be one of: Sovietsky, Kirovsky, Leninsky"
                ))
            })
    }
}

impl TryFrom<String> for District {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_from_str() {
        for d in District::ALL {
            assert_eq!(d.as_str().parse::<District>().unwrap(), d);
        }
    }

    #[test]
    fn parsing_is_case_sensitive() {
        assert!("kirovsky".parse::<District>().is_err());
        assert!("".parse::<District>().is_err());
    }

    #[test]
    fn serde_uses_the_persisted_codes() {
        let json = serde_json::to_string(&District::Leninsky).unwrap();
        assert_eq!(json, "\"Leninsky\"");
        let parsed: District = serde_json::from_str("\"Sovietsky\"").unwrap();
        assert_eq!(parsed, District::Sovietsky);
    }
}
