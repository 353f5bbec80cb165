//! CLLI identifier with validation.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Common Language Location Identifier naming a chassis.
///
/// Real CLLI codes are 11 characters (8 for the building, 3 for the
/// equipment); shorter codes are accepted so lab topologies can use
/// abbreviated names.
///
/// # Examples
///
/// ```
/// use olt_types::Clli;
///
/// let clli = Clli::new("STLSMO09DS0").unwrap();
/// assert_eq!(clli.as_str(), "STLSMO09DS0");
///
/// assert!(Clli::new("").is_err());
/// assert!(Clli::new("NOT A CLLI").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Clli(String);

impl Clli {
    /// Maximum CLLI length.
    pub const MAX_LEN: usize = 11;

    /// Creates a new CLLI.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is empty, longer than 11 characters or
    /// contains anything other than ASCII letters and digits.
    pub fn new(code: impl Into<String>) -> Result<Self, ParseError> {
        let code = code.into();
        let valid = !code.is_empty()
            && code.len() <= Self::MAX_LEN
            && code.chars().all(|c| c.is_ascii_alphanumeric());
        if valid {
            Ok(Clli(code))
        } else {
            Err(ParseError::InvalidClli(code))
        }
    }

    /// Returns the CLLI as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Clli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Clli {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Clli::new(s)
    }
}

impl TryFrom<String> for Clli {
    type Error = ParseError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Clli::new(code)
    }
}

impl From<Clli> for String {
    fn from(clli: Clli) -> String {
        clli.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_valid_clli() {
        assert!(Clli::new("STLSMO09DS0").is_ok());
        assert!(Clli::new("LAB1").is_ok());
    }

    #[test]
    fn test_invalid_clli() {
        assert!(Clli::new("").is_err());
        assert!(Clli::new("STLSMO09DS01").is_err());
        assert!(Clli::new("lab-1").is_err());
    }

    #[test]
    fn test_parse_and_display() {
        let clli: Clli = "ATLNGA05DS1".parse().unwrap();
        assert_eq!(clli.to_string(), "ATLNGA05DS1");
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let ok: Clli = serde_json::from_str("\"LAB1\"").unwrap();
        assert_eq!(ok.as_str(), "LAB1");
        assert!(serde_json::from_str::<Clli>("\"bad clli\"").is_err());
    }
}
