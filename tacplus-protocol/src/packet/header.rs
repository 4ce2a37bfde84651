use byteorder::{ByteOrder, NetworkEndian};
use getset::{CopyGetters, MutGetters};

use super::{PacketFlags, PacketType};
use crate::{DeserializeError, SerializeError, Version};

/// Information included in a TACACS+ packet header.
#[derive(PartialEq, Eq, Debug, Clone, CopyGetters, MutGetters)]
pub struct HeaderInfo {
    #[getset(get_copy = "pub")]
    /// The protocol major and minor version.
    version: Version,

    #[getset(get_copy = "pub")]
    /// The sequence number of the packet. This should be odd for client packets, and even for server packets.
    sequence_number: u8,

    #[getset(get_copy = "pub", get_mut = "pub(super)")]
    /// Session/packet flags.
    flags: PacketFlags,

    #[getset(get_copy = "pub")]
    /// ID of the current session.
    session_id: u32,
}

impl HeaderInfo {
    /// Size of a full TACACS+ packet header.
    pub const HEADER_SIZE_BYTES: usize = 12;

    /// Bundles some information to be put in the header of a TACACS+ packet.
    pub fn new(version: Version, sequence_number: u8, flags: PacketFlags, session_id: u32) -> Self {
        Self {
            version,
            sequence_number,
            flags,
            session_id,
        }
    }

    /// Reads the body length from a raw header, so a reader knows how many more bytes to expect.
    pub fn body_length(raw_header: &[u8; Self::HEADER_SIZE_BYTES]) -> u32 {
        // body length goes at the end of the header (last 4 bytes)
        NetworkEndian::read_u32(&raw_header[8..12])
    }

    /// Appends a complete header for a body of the given type and length.
    pub(super) fn serialize(
        &self,
        buffer: &mut Vec<u8>,
        packet_type: PacketType,
        body_length: usize,
    ) -> Result<(), SerializeError> {
        let mut header = [0; Self::HEADER_SIZE_BYTES];

        header[0] = self.version.into();
        header[1] = packet_type as u8;
        header[2] = self.sequence_number;
        header[3] = self.flags.bits();

        // session id is middle 4 bytes of header
        NetworkEndian::write_u32(&mut header[4..8], self.session_id);
        NetworkEndian::write_u32(&mut header[8..12], body_length.try_into()?);

        buffer.extend_from_slice(&header);
        Ok(())
    }
}

impl TryFrom<&[u8]> for HeaderInfo {
    type Error = DeserializeError;

    fn try_from(buffer: &[u8]) -> Result<Self, Self::Error> {
        if buffer.len() < Self::HEADER_SIZE_BYTES {
            return Err(DeserializeError::UnexpectedEnd);
        }

        let header = Self {
            version: buffer[0].try_into()?,
            sequence_number: buffer[2],
            flags: PacketFlags::from_bits(buffer[3])
                .ok_or(DeserializeError::InvalidHeaderFlags(buffer[3]))?,
            session_id: NetworkEndian::read_u32(&buffer[4..8]),
        };

        Ok(header)
    }
}
