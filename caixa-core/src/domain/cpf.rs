//! CPF identifier

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::result::Error;

/// An 11-digit CPF, stored digit-only.
///
/// Validation happens once at the boundary (`Cpf::parse`); everything past
/// that point can rely on the invariant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cpf(String);

impl Cpf {
    /// Parse a CPF from user input.
    ///
    /// Non-digit characters (dots, dashes) are stripped; the digit-only form
    /// must be exactly 11 digits.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() != 11 {
            return Err(Error::InvalidIdentifier(raw.trim().to_string()));
        }
        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display form with separators: `123.456.789-00`
    pub fn formatted(&self) -> String {
        format!(
            "{}.{}.{}-{}",
            &self.0[..3],
            &self.0[3..6],
            &self.0[6..9],
            &self.0[9..]
        )
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
