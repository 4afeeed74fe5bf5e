//! Shopper email addresses.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why a string was rejected as an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email must be at most {max} characters")]
    TooLong { max: usize },
    #[error("email must contain exactly one @ symbol")]
    AtSymbol,
    #[error("email cannot contain whitespace")]
    ContainsWhitespace,
    #[error("email needs text on both sides of the @")]
    MissingPart,
}

/// A trimmed email address of the form `local@domain`.
///
/// Only the shape is checked. Addresses are stored and compared exactly as
/// given after trimming, so `Jane@example.com` and `jane@example.com` are
/// two accounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Longest address accepted (RFC 5321 path limit).
    pub const MAX_LENGTH: usize = 254;

    /// Trim and validate an address from a form field.
    ///
    /// # Errors
    ///
    /// Returns the first [`EmailError`] the trimmed input violates.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let s = s.trim();

        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if s.chars().any(char::is_whitespace) {
            return Err(EmailError::ContainsWhitespace);
        }

        let (local, domain) = s.split_once('@').ok_or(EmailError::AtSymbol)?;
        if domain.contains('@') {
            return Err(EmailError::AtSymbol);
        }
        if local.is_empty() || domain.is_empty() {
            return Err(EmailError::MissingPart);
        }

        Ok(Self(s.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_addresses() {
        for ok in ["jane@example.com", "jane.doe+groceries@shop.example.co.uk"] {
            assert_eq!(Email::parse(ok).unwrap().as_str(), ok);
        }
        assert_eq!(
            Email::parse("  shopper@example.com\n").unwrap().as_str(),
            "shopper@example.com"
        );
    }

    #[test]
    fn test_case_is_preserved() {
        assert_ne!(
            Email::parse("Jane@example.com").unwrap(),
            Email::parse("jane@example.com").unwrap()
        );
    }

    #[test]
    fn test_rejected_shapes() {
        let cases = [
            ("   ", EmailError::Empty),
            ("jane.example.com", EmailError::AtSymbol),
            ("jane@doe@example.com", EmailError::AtSymbol),
            ("jane doe@example.com", EmailError::ContainsWhitespace),
            ("@example.com", EmailError::MissingPart),
            ("jane@", EmailError::MissingPart),
        ];
        for (input, expected) in cases {
            assert_eq!(Email::parse(input).unwrap_err(), expected, "{input:?}");
        }

        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(EmailError::TooLong { .. })
        ));
    }
}
