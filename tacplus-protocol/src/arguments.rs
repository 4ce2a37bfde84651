use std::error::Error;
use std::fmt;

use bitflags::bitflags;
use getset::{CopyGetters, Getters};

use super::DeserializeError;
use crate::FieldText;


/// An argument (attribute-value pair) in the TACACS+ protocol.
#[derive(Clone, Default, PartialEq, Eq, Debug, Hash, Getters, CopyGetters)]
pub struct Argument {
    /// The name of the argument.
    #[getset(get = "pub")]
    name: FieldText,

    /// The value of the argument.
    #[getset(get = "pub")]
    value: FieldText,

    /// Whether processing this argument is mandatory.
    #[getset(get_copy = "pub")]
    mandatory: bool,
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // just write as encoded form (name + delimiter + value)
        write!(f, "{}{}{}", self.name, self.delimiter(), self.value)
    }
}

/// Reasons an argument could not be constructed or decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidArgument {
    /// Argument had empty name.
    EmptyName,

    /// Argument name contained a delimiter (= or *).
    NameContainsDelimiter,

    /// Argument encoding did not contain a delimiter.
    NoDelimiter,

    /// Argument was too long to be encodeable.
    TooLong,

    /// Argument wasn't valid printable ASCII, as specified in [RFC8907 section 3.7].
    ///
    /// [RFC8907 section 3.7]: https://www.rfc-editor.org/rfc/rfc8907.html#section-3.7
    BadText,
}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "arguments cannot have empty names"),
            Self::NameContainsDelimiter => write!(
                f,
                "names cannot contain value delimiter characters (= or *)"
            ),
            Self::NoDelimiter => write!(f, "encoded argument value had no delimiter"),
            Self::TooLong => write!(f, "the total length of an argument (name + length + delimiter) must not exceed u8::MAX, for encoding reasons"),
            Self::BadText => write!(f, "encoded argument value was not printable ASCII"),
        }
    }
}

impl Error for InvalidArgument {}

impl From<InvalidArgument> for DeserializeError {
    fn from(value: InvalidArgument) -> Self {
        Self::InvalidArgument(value)
    }
}

bitflags! {
    /// Flags controlling how an encoded `name=value` string is turned into an [`Argument`].
    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    pub struct ArgumentFlags: u8 {
        /// Marks the argument mandatory regardless of the delimiter used in its encoding.
        const MANDATORY = 0b00000001;
    }
}

impl Argument {
    /// The delimiter used for a required argument.
    const MANDATORY_DELIMITER: char = '=';

    /// The delimiter used for an optional argument.
    const OPTIONAL_DELIMITER: char = '*';

    /// Constructs an argument, enforcing a maximum combined name + value + delimiter length of `u8::MAX` (as it must fit in a single byte for encoding reasons).
    pub fn new(name: FieldText, value: FieldText, mandatory: bool) -> Result<Self, InvalidArgument> {
        if name.is_empty() {
            Err(InvalidArgument::EmptyName)
        } else if name.contains_any(&[Self::MANDATORY_DELIMITER, Self::OPTIONAL_DELIMITER]) {
            // "An argument name MUST NOT contain either of the separators." [RFC 8907]
            Err(InvalidArgument::NameContainsDelimiter)
        } else if u8::try_from(name.len() + 1 + value.len()).is_err() {
            // length of encoded argument (i.e., including delimiter) must also fit in a u8 to be encodeable
            Err(InvalidArgument::TooLong)
        } else {
            Ok(Argument {
                name,
                value,
                mandatory,
            })
        }
    }

    /// Parses an argument from its textual encoding, e.g. `service=shell` or `cmd*show`.
    ///
    /// The first delimiter that appears splits name from value, and determines whether the
    /// argument is mandatory (`=`) or optional (`*`), unless [`ArgumentFlags::MANDATORY`] overrides it.
    pub fn from_encoded(encoded: &str, flags: ArgumentFlags) -> Result<Self, InvalidArgument> {
        let mut argument = Self::deserialize(encoded.as_bytes())?;
        if flags.contains(ArgumentFlags::MANDATORY) {
            argument.mandatory = true;
        }

        Ok(argument)
    }

    /// The encoded length of an argument, including the name/value/delimiter but not the byte holding its length earlier on in a packet.
    pub(super) fn encoded_length(&self) -> u8 {
        // lengths are checked in new(), so this saturation never kicks in
        u8::try_from(self.name.len() + 1 + self.value.len()).unwrap_or(u8::MAX)
    }

    /// Appends an argument's name-value encoding, as done in the body of a packet.
    pub(super) fn serialize(&self, buffer: &mut Vec<u8>) {
        buffer.extend_from_slice(self.name.as_bytes());

        // choose delimiter based on whether argument is required
        buffer.push(self.delimiter() as u8);

        buffer.extend_from_slice(self.value.as_bytes());
    }

    /// Returns the delimiter that will be used for this argument when it's encoded on the wire,
    /// based on whether it's mandatory or not.
    fn delimiter(&self) -> char {
        if self.mandatory {
            Self::MANDATORY_DELIMITER
        } else {
            Self::OPTIONAL_DELIMITER
        }
    }

    /// Attempts to decode an argument from its name-value encoding on the wire.
    pub(super) fn deserialize(buffer: &[u8]) -> Result<Self, InvalidArgument> {
        // names MUST NOT (RFC 8907) contain either delimiter, so the first one found is the actual delimiter
        let delimiter_index = buffer
            .iter()
            .position(|&c| {
                c == Self::MANDATORY_DELIMITER as u8 || c == Self::OPTIONAL_DELIMITER as u8
            })
            .ok_or(InvalidArgument::NoDelimiter)?;

        let mandatory = buffer[delimiter_index] == Self::MANDATORY_DELIMITER as u8;

        // ensure name/value are valid text values per RFC 8907 (i.e., fully printable ASCII)
        let name = FieldText::try_from(&buffer[..delimiter_index])
            .map_err(|_| InvalidArgument::BadText)?;
        let value = FieldText::try_from(&buffer[delimiter_index + 1..])
            .map_err(|_| InvalidArgument::BadText)?;

        // use constructor here to perform checks on fields to avoid diverging code paths
        Self::new(name, value, mandatory)
    }
}
