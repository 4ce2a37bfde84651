use std::iter::zip;

use bitflags::bitflags;
use getset::Getters;
use md5::{Digest, Md5};
use num_enum::{TryFromPrimitive, TryFromPrimitiveError};

use super::PacketBody;
use super::{DeserializeError, SerializeError};

pub(super) mod header;
use header::HeaderInfo;


bitflags! {
    /// Flags to indicate information about packets or the client/server.
    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    pub struct PacketFlags: u8 {
        /// Indicates the body of the packet is unobfuscated.
        ///
        /// Note that RFC 8907 specifies that "this option is deprecated and **MUST NOT** be used in production" ([section 4.5]).
        ///
        /// [section 4.5]: https://www.rfc-editor.org/rfc/rfc8907.html#section-4.5-16
        const UNENCRYPTED       = 0b00000001;

        /// Signals to the server that the client would like to reuse a TCP connection across multiple sessions.
        const SINGLE_CONNECTION = 0b00000100;
    }
}

/// The type of a protocol packet. Only authorization packets are handled here, so
/// authentication (0x1) and accounting (0x3) are rejected like any other unknown type.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, TryFromPrimitive)]
pub enum PacketType {
    /// Authorization packet.
    Authorization = 0x2,
}

#[doc(hidden)]
impl From<TryFromPrimitiveError<PacketType>> for DeserializeError {
    fn from(value: TryFromPrimitiveError<PacketType>) -> Self {
        Self::InvalidPacketType(value.number)
    }
}

/// A full TACACS+ protocol packet.
#[derive(Getters, Debug, PartialEq, Eq)]
pub struct Packet<B: PacketBody> {
    /// Gets some of the header information associated with a packet.
    #[getset(get = "pub")]
    header: HeaderInfo,

    /// Gets the body of the packet.
    #[getset(get = "pub")]
    body: B,
}

/// MD5 hash output size, in bytes.
const MD5_OUTPUT_SIZE: usize = 16;

/// (De)obfuscates the body of a packet as specified in [RFC8907 section 4.5].
///
/// Since obfuscation is done by XOR, obfuscating & deobfuscating are the same operation.
///
/// [RFC8907 section 4.5]: https://www.rfc-editor.org/rfc/rfc8907.html#name-data-obfuscation
pub(super) fn xor_body_with_pad(header: &HeaderInfo, secret_key: &[u8], body_buffer: &mut [u8]) {
    // prehash common prefix for all hash invocations
    // prefix: session id -> key -> version -> sequence number
    let mut prefix_hasher = Md5::new();
    prefix_hasher.update(header.session_id().to_be_bytes());
    prefix_hasher.update(secret_key);
    prefix_hasher.update([u8::from(header.version()), header.sequence_number()]);

    // first chunk just uses hashed prefix
    let mut pseudo_pad = prefix_hasher.clone().finalize();

    for (index, chunk) in body_buffer.chunks_mut(MD5_OUTPUT_SIZE).enumerate() {
        if index > 0 {
            // previous pad chunk is appended to prefix prehashed above
            let mut hasher = prefix_hasher.clone();
            hasher.update(pseudo_pad);
            pseudo_pad = hasher.finalize();
        }

        xor_slices(chunk, &pseudo_pad);
    }
}

/// XORs two byte slices together, truncating to the shorter of the two argument lengths.
fn xor_slices(output: &mut [u8], pseudo_pad: &[u8]) {
    for (out, pad) in zip(output, pseudo_pad) {
        *out ^= pad;
    }
}

impl<B: PacketBody> Packet<B> {
    /// Location of the start of the packet body, after the header.
    const BODY_START: usize = HeaderInfo::HEADER_SIZE_BYTES;

    /// Assembles a header and body into a full packet.
    pub fn new(header: HeaderInfo, body: B) -> Self {
        Self { header, body }
    }

    /// Serializes the packet, obfuscating the body using a pseudo-pad generated by iterating the MD5 hash function.
    ///
    /// This consumes the packet and also ensures the [`UNENCRYPTED`](PacketFlags::UNENCRYPTED) flag is unset.
    pub fn serialize<K: AsRef<[u8]>>(mut self, secret_key: K) -> Result<Vec<u8>, SerializeError> {
        self.header.flags_mut().remove(PacketFlags::UNENCRYPTED);

        let mut buffer = self.serialize_packet()?;
        xor_body_with_pad(
            &self.header,
            secret_key.as_ref(),
            &mut buffer[Self::BODY_START..],
        );

        Ok(buffer)
    }

    /// Serializes the packet, leaving the body as cleartext.
    ///
    /// This consumes the packet and sets the [`UNENCRYPTED`](PacketFlags::UNENCRYPTED) flag if necessary.
    pub fn serialize_unobfuscated(mut self) -> Result<Vec<u8>, SerializeError> {
        self.header.flags_mut().insert(PacketFlags::UNENCRYPTED);
        self.serialize_packet()
    }

    fn serialize_packet(&self) -> Result<Vec<u8>, SerializeError> {
        // serialize body first to get its length, which is stored in the header
        let mut body = Vec::new();
        self.body.serialize_into(&mut body)?;

        let mut buffer = Vec::with_capacity(HeaderInfo::HEADER_SIZE_BYTES + body.len());
        self.header.serialize(&mut buffer, B::TYPE, body.len())?;
        buffer.extend_from_slice(&body);

        Ok(buffer)
    }

    /// Attempts to deserialize an obfuscated packet with the provided secret key.
    ///
    /// The body is deobfuscated in place. This function also ensures that the
    /// [`UNENCRYPTED`](PacketFlags::UNENCRYPTED) flag is not set, and returns an error if it is.
    pub fn deserialize<K: AsRef<[u8]>>(
        secret_key: K,
        buffer: &mut [u8],
    ) -> Result<Self, DeserializeError> {
        let header = HeaderInfo::try_from(&*buffer)?;

        if header.flags().contains(PacketFlags::UNENCRYPTED) {
            return Err(DeserializeError::IncorrectUnencryptedFlag);
        }

        let body_length = Self::checked_body_length(buffer)?;
        let body_buffer = &mut buffer[Self::BODY_START..Self::BODY_START + body_length];
        xor_body_with_pad(&header, secret_key.as_ref(), body_buffer);

        let body = B::deserialize_from(body_buffer)?;
        Ok(Self::new(header, body))
    }

    /// Attempts to deserialize a cleartext packet from a buffer.
    ///
    /// This function also ensures that the [`UNENCRYPTED`](PacketFlags::UNENCRYPTED)
    /// is set, and returns an error if it is not.
    pub fn deserialize_unobfuscated(buffer: &[u8]) -> Result<Self, DeserializeError> {
        let header = HeaderInfo::try_from(buffer)?;

        if !header.flags().contains(PacketFlags::UNENCRYPTED) {
            return Err(DeserializeError::IncorrectUnencryptedFlag);
        }

        let body_length = Self::checked_body_length(buffer)?;
        let body = B::deserialize_from(&buffer[Self::BODY_START..Self::BODY_START + body_length])?;
        Ok(Self::new(header, body))
    }

    /// Checks the packet type of a raw packet and that the buffer holds the whole body, returning the body length.
    fn checked_body_length(buffer: &[u8]) -> Result<usize, DeserializeError> {
        PacketType::try_from(buffer[1])?;

        let mut raw_header = [0; HeaderInfo::HEADER_SIZE_BYTES];
        raw_header.copy_from_slice(&buffer[..HeaderInfo::HEADER_SIZE_BYTES]);
        let body_length = HeaderInfo::body_length(&raw_header) as usize;

        // NOTE: checked here to avoid a panic when slicing a buffer shorter than body_length
        if buffer[Self::BODY_START..].len() >= body_length {
            Ok(body_length)
        } else {
            Err(DeserializeError::UnexpectedEnd)
        }
    }
}
