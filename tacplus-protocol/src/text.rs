//! Convenience type for enforcing valid ASCII printable strings.

use std::error::Error;
use std::fmt;
use std::ops::Deref;


/// A `String` that is checked to be printable ASCII, which is
/// defined as not containing control characters in [RFC8907 section 3.7].
///
/// # Examples
///
/// ```
/// use tacplus_protocol::FieldText;
///
/// assert!(FieldText::try_from("a string").is_ok());
/// assert!(FieldText::try_from("tab\tseparated").is_err());
/// assert!(FieldText::try_from("café").is_err());
/// ```
///
/// [RFC8907 section 3.7]: https://www.rfc-editor.org/rfc/rfc8907.html#section-3.7
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct FieldText(String);

/// Error returned when text is not printable ASCII.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidText(pub String);

impl fmt::Display for InvalidText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} is not printable ASCII", self.0)
    }
}

impl Error for InvalidText {}

impl FieldText {
    /// Returns the underlying string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the text contains any of the provided characters, or false otherwise.
    pub fn contains_any(&self, characters: &[char]) -> bool {
        self.0.contains(characters)
    }
}

fn is_printable_ascii(string: &str) -> bool {
    // all characters must be ASCII printable (i.e., not control characers)
    string.chars().all(|c| c.is_ascii() && !c.is_ascii_control())
}

impl Deref for FieldText {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for FieldText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FieldText {
    type Error = InvalidText;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_printable_ascii(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidText(value))
        }
    }
}

impl TryFrom<&str> for FieldText {
    type Error = InvalidText;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.to_owned().try_into()
    }
}

impl TryFrom<&[u8]> for FieldText {
    type Error = InvalidText;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        match std::str::from_utf8(value) {
            Ok(string) => string.try_into(),
            Err(_) => Err(InvalidText(String::from_utf8_lossy(value).into_owned())),
        }
    }
}

impl PartialEq<&str> for FieldText {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for FieldText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <_ as fmt::Display>::fmt(&self.0, f)
    }
}
