//! # tacplus-protocol
//!
//! Encoding and decoding of TACACS+ ([RFC8907](https://www.rfc-editor.org/rfc/rfc8907)) authorization packets.
//!
//! Only the authorization packet type is supported; authentication and accounting bodies are out of scope.

#![warn(missing_docs)]
#![warn(clippy::cast_lossless)]
#![warn(clippy::cast_possible_truncation)]

use std::error::Error;
use std::fmt;
use std::num::TryFromIntError;

pub mod authorization;

mod arguments;
pub use arguments::{Argument, ArgumentFlags, InvalidArgument};

mod fields;
pub use fields::*;

mod packet;
pub use packet::header::HeaderInfo;
pub use packet::{Packet, PacketFlags, PacketType};

mod text;
pub use text::{FieldText, InvalidText};

/// An error that occurred when serializing a packet or any of its components into their binary format.
#[non_exhaustive]
#[derive(Debug, PartialEq, Eq)]
pub enum SerializeError {
    /// The length of a field exceeded the maximum value encodeable on the wire.
    LengthOverflow,

    /// More arguments were supplied than fit in a single packet (`u8::MAX`).
    TooManyArguments(usize),
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthOverflow => write!(f, "field length overflowed"),
            Self::TooManyArguments(count) => write!(
                f,
                "{count} arguments supplied, but at most {} fit in a packet",
                u8::MAX
            ),
        }
    }
}

impl From<TryFromIntError> for SerializeError {
    fn from(_value: TryFromIntError) -> Self {
        Self::LengthOverflow
    }
}

/// An error that occurred during deserialization of a full/partial packet.
#[non_exhaustive]
#[derive(Debug, PartialEq, Eq)]
pub enum DeserializeError {
    /// Invalid packet type number on the wire.
    InvalidPacketType(u8),

    /// Invalid header flag byte.
    InvalidHeaderFlags(u8),

    /// Invalid version number.
    InvalidVersion(u8),

    /// Invalid arguments when deserializing
    InvalidArgument(InvalidArgument),

    /// The [`UNENCRYPTED`](PacketFlags::UNENCRYPTED) flag did not match the obfuscation mode requested.
    IncorrectUnencryptedFlag,

    /// Text field was not printable ASCII when it should have been.
    BadText,

    /// Invalid byte representation of an object.
    InvalidWireBytes,

    /// The lengths encoded in a packet body did not add up to the size of the body.
    WrongBodyBufferSize {
        /// The body size computed from the encoded field lengths.
        expected: usize,

        /// The size of the body as given by the packet header.
        buffer_size: usize,
    },

    /// Object representation was cut off in some way.
    UnexpectedEnd,

    /// A header declared a body longer than its packet type can hold.
    BodyTooLong {
        /// The body length given in the header.
        declared: u32,

        /// The largest body the packet type allows.
        limit: usize,
    },
}

impl fmt::Display for DeserializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPacketType(num) => write!(f, "invalid packet type byte: {num:#x}"),
            Self::InvalidHeaderFlags(num) => write!(f, "invalid header flags: {num:#x}"),
            Self::InvalidVersion(num) => write!(
                f,
                "invalid version number: major {:#x}, minor {:#x}",
                num >> 4,     // major version is 4 upper bits of byte
                num & 0b1111  // minor version is 4 lower bits
            ),
            Self::InvalidArgument(reason) => write!(f, "invalid argument: {reason}"),
            Self::IncorrectUnencryptedFlag => write!(
                f,
                "unencrypted flag did not match obfuscation (is the shared secret configured on both ends?)"
            ),
            Self::BadText => write!(f, "text field was not printable ASCII"),
            Self::InvalidWireBytes => write!(f, "invalid byte representation of object"),
            Self::WrongBodyBufferSize {
                expected,
                buffer_size,
            } => write!(
                f,
                "body length mismatch: fields add up to {expected} bytes but header reports {buffer_size}"
            ),
            Self::UnexpectedEnd => write!(f, "unexpected end of buffer when deserializing object"),
            Self::BodyTooLong { declared, limit } => write!(
                f,
                "header declares a {declared} byte body but at most {limit} bytes are possible"
            ),
        }
    }
}

impl Error for DeserializeError {}
impl Error for SerializeError {}

// seals the PacketBody trait
mod sealed {
    use super::authorization;

    pub trait Sealed {}

    impl Sealed for authorization::Request {}
    impl Sealed for authorization::Reply {}
}

/// The major version of the TACACS+ protocol.
#[repr(u8)]
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MajorVersion {
    /// The only current major version specified in RFC8907.
    RFC8907 = 0xc,
}

/// The minor version of the TACACS+ protocol in use, which specifies choices for authentication methods.
#[repr(u8)]
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MinorVersion {
    /// Default minor version, used for authorization.
    Default = 0x0,
    /// Minor version 1, which is used for (MS)CHAP and PAP authentication.
    V1 = 0x1,
}

/// The full protocol version.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Version(MajorVersion, MinorVersion);

impl Version {
    /// Bundles together a TACACS+ protocol major and minor version.
    pub fn new(major: MajorVersion, minor: MinorVersion) -> Self {
        Self(major, minor)
    }

    /// Gets the major TACACS+ version.
    pub fn major(&self) -> MajorVersion {
        self.0
    }

    /// Gets the minor TACACS+ version.
    pub fn minor(&self) -> MinorVersion {
        self.1
    }
}

impl Default for Version {
    fn default() -> Self {
        Self(MajorVersion::RFC8907, MinorVersion::Default)
    }
}

impl TryFrom<u8> for Version {
    type Error = DeserializeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        // only major version is 0xc currently
        if value >> 4 == MajorVersion::RFC8907 as u8 {
            let minor_version = match value & 0xf {
                0 => Ok(MinorVersion::Default),
                1 => Ok(MinorVersion::V1),
                _ => Err(DeserializeError::InvalidVersion(value)),
            }?;

            Ok(Self(MajorVersion::RFC8907, minor_version))
        } else {
            Err(DeserializeError::InvalidVersion(value))
        }
    }
}

impl From<Version> for u8 {
    fn from(value: Version) -> Self {
        ((value.0 as u8) << 4) | (value.1 as u8 & 0xf)
    }
}

/// A type that can be treated as a TACACS+ protocol packet body.
///
/// This trait is sealed, so it cannot be implemented by external types.
pub trait PacketBody: sealed::Sealed + Sized {
    /// Type of the packet (only authorization is supported).
    const TYPE: PacketType;

    /// Length of body just including required fields.
    const REQUIRED_FIELDS_LENGTH: usize;

    /// Largest body the length fields of this packet type can describe.
    const MAX_LENGTH: usize;

    /// Appends the wire encoding of this body to a buffer.
    fn serialize_into(&self, buffer: &mut Vec<u8>) -> Result<(), SerializeError>;

    /// Decodes a body from a buffer holding exactly the (cleartext) body bytes.
    fn deserialize_from(buffer: &[u8]) -> Result<Self, DeserializeError>;
}
