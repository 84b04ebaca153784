//! Contact phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty (or only separators).
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains a character that is neither a digit nor a separator.
    #[error("phone number contains invalid character '{0}'")]
    InvalidCharacter(char),
    /// Too few or too many digits.
    #[error("phone number must have between {min} and {max} digits (got {got})")]
    InvalidLength {
        /// Minimum number of digits.
        min: usize,
        /// Maximum number of digits.
        max: usize,
        /// Number of digits found.
        got: usize,
    },
}

/// A shop's contact number.
///
/// Numbers that parse under [`Phone::parse`] are kept in international digit
/// form (no `+`, no separators), which is what `wa.me` links expect. The data
/// service also holds free-form entries such as `"07 00 00 00 00 poste 2"`;
/// [`Phone::from_wire`] keeps those verbatim so the contact panel still shows
/// them, and their link carries the percent-encoded text.
///
/// ## Examples
///
/// ```
/// use partner_shops_core::Phone;
///
/// let phone = Phone::parse("+33 6 12 34 56 78").unwrap();
/// assert_eq!(phone.as_str(), "33612345678");
/// assert_eq!(phone.whatsapp_url(), "https://wa.me/33612345678");
///
/// let loose = Phone::from_wire("12345").unwrap();
/// assert!(!loose.is_normalized());
/// assert!(Phone::from_wire("   ").is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Phone {
    value: String,
    normalized: bool,
}

impl Phone {
    /// Minimum number of digits.
    pub const MIN_DIGITS: usize = 6;
    /// Maximum number of digits (E.164).
    pub const MAX_DIGITS: usize = 15;

    /// Strictly parse an international number.
    ///
    /// Separators (space, `-`, `.`, `(`, `)`) and one leading `+` are
    /// stripped; 6-15 digits must remain.
    ///
    /// # Errors
    ///
    /// Returns an error if the input has no digits, contains characters other
    /// than digits and separators, or has a digit count outside 6-15.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let trimmed = s.trim();
        let body = trimmed.strip_prefix('+').unwrap_or(trimmed);

        let mut digits = String::with_capacity(body.len());
        for c in body.chars() {
            match c {
                '0'..='9' => digits.push(c),
                ' ' | '-' | '.' | '(' | ')' => {}
                other => return Err(PhoneError::InvalidCharacter(other)),
            }
        }

        if digits.is_empty() {
            return Err(PhoneError::Empty);
        }

        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits.len()) {
            return Err(PhoneError::InvalidLength {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
                got: digits.len(),
            });
        }

        Ok(Self {
            value: digits,
            normalized: true,
        })
    }

    /// Accept a number as stored by the data service.
    ///
    /// Blank input is no number at all. Anything else is kept: normalized
    /// when it parses, verbatim (trimmed) otherwise.
    #[must_use]
    pub fn from_wire(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return None;
        }

        Some(Self::parse(trimmed).unwrap_or_else(|_| Self {
            value: trimmed.to_string(),
            normalized: false,
        }))
    }

    /// The digits for a normalized number, the stored text otherwise.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Whether the number passed [`Phone::parse`].
    #[must_use]
    pub const fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Link that opens a WhatsApp conversation with this number.
    #[must_use]
    pub fn whatsapp_url(&self) -> String {
        if self.normalized {
            return format!("https://wa.me/{}", self.value);
        }

        // The URL parser percent-encodes whatever the path needs
        Url::parse(&format!("https://wa.me/{}", self.value)).map_or_else(
            |_| {
                let digits: String = self.value.chars().filter(char::is_ascii_digit).collect();
                format!("https://wa.me/{digits}")
            },
            String::from,
        )
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.normalized {
            write!(f, "+{}", self.value)
        } else {
            f.write_str(&self.value)
        }
    }
}

impl TryFrom<String> for Phone {
    type Error = PhoneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_wire(&value).ok_or(PhoneError::Empty)
    }
}

impl From<Phone> for String {
    fn from(phone: Phone) -> Self {
        phone.value
    }
}

impl core::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
