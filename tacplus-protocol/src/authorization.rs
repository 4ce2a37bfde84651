//! Authorization features/packets of the TACACS+ protocol.

use byteorder::{ByteOrder, NetworkEndian};
use getset::{CopyGetters, Getters};
use num_enum::TryFromPrimitive;

use super::{
    Argument, AuthenticationContext, AuthenticationMethod, AuthenticationService,
    AuthenticationType, DeserializeError, FieldText, PacketBody, PacketType, PrivilegeLevel,
    SerializeError, UserInformation,
};


/// An authorization request packet body, including arguments.
#[derive(Clone, Debug, PartialEq, Eq, Getters, CopyGetters)]
pub struct Request {
    /// Method used to authenticate to TACACS+ client.
    #[getset(get_copy = "pub")]
    method: AuthenticationMethod,

    /// Other client authentication information.
    #[getset(get_copy = "pub")]
    authentication_context: AuthenticationContext,

    /// Information about the user connected to the TACACS+ client.
    #[getset(get = "pub")]
    user_information: UserInformation,

    /// Additional arguments to provide as part of an authorization request.
    #[getset(get = "pub")]
    arguments: Vec<Argument>,
}

impl Request {
    /// Assembles an authorization request packet from its fields.
    pub fn new(
        method: AuthenticationMethod,
        authentication_context: AuthenticationContext,
        user_information: UserInformation,
        arguments: Vec<Argument>,
    ) -> Self {
        Self {
            method,
            authentication_context,
            user_information,
            arguments,
        }
    }
}

impl PacketBody for Request {
    const TYPE: PacketType = PacketType::Authorization;

    // 4 extra bytes come from user information lengths (user, port, remote address) and argument count
    const REQUIRED_FIELDS_LENGTH: usize = 1 + AuthenticationContext::WIRE_SIZE + 4;

    // three user information fields and up to 255 arguments, each at most 255 bytes
    const MAX_LENGTH: usize = Self::REQUIRED_FIELDS_LENGTH + 255 + (3 + 255) * 255;

    fn serialize_into(&self, buffer: &mut Vec<u8>) -> Result<(), SerializeError> {
        let argument_count = u8::try_from(self.arguments.len())
            .map_err(|_| SerializeError::TooManyArguments(self.arguments.len()))?;

        buffer.push(self.method as u8);
        self.authentication_context.serialize(buffer);
        self.user_information.serialize_field_lengths(buffer)?;

        buffer.push(argument_count);
        buffer.extend(self.arguments.iter().map(Argument::encoded_length));

        self.user_information.serialize_field_values(buffer);
        for argument in &self.arguments {
            argument.serialize(buffer);
        }

        Ok(())
    }

    fn deserialize_from(buffer: &[u8]) -> Result<Self, DeserializeError> {
        if buffer.len() < Self::REQUIRED_FIELDS_LENGTH {
            return Err(DeserializeError::UnexpectedEnd);
        }

        let method =
            AuthenticationMethod::try_from(buffer[0]).map_err(|_| DeserializeError::InvalidWireBytes)?;
        let privilege_level =
            PrivilegeLevel::new(buffer[1]).ok_or(DeserializeError::InvalidWireBytes)?;
        let authentication_type =
            AuthenticationType::try_from(buffer[2]).map_err(|_| DeserializeError::InvalidWireBytes)?;
        let service = AuthenticationService::try_from(buffer[3])
            .map_err(|_| DeserializeError::InvalidWireBytes)?;

        let user_length = buffer[4] as usize;
        let port_length = buffer[5] as usize;
        let remote_address_length = buffer[6] as usize;
        let argument_count = buffer[7] as usize;

        let lengths_end = Self::REQUIRED_FIELDS_LENGTH + argument_count;
        let argument_lengths = buffer
            .get(Self::REQUIRED_FIELDS_LENGTH..lengths_end)
            .ok_or(DeserializeError::UnexpectedEnd)?;

        let expected = lengths_end
            + user_length
            + port_length
            + remote_address_length
            + argument_lengths.iter().map(|&length| length as usize).sum::<usize>();

        if expected != buffer.len() {
            return Err(DeserializeError::WrongBodyBufferSize {
                expected,
                buffer_size: buffer.len(),
            });
        }

        let port_start = lengths_end + user_length;
        let remote_address_start = port_start + port_length;
        let arguments_start = remote_address_start + remote_address_length;

        let user = std::str::from_utf8(&buffer[lengths_end..port_start])
            .map_err(|_| DeserializeError::InvalidWireBytes)?
            .to_owned();
        let port = FieldText::try_from(&buffer[port_start..remote_address_start])
            .map_err(|_| DeserializeError::BadText)?;
        let remote_address = FieldText::try_from(&buffer[remote_address_start..arguments_start])
            .map_err(|_| DeserializeError::BadText)?;

        // lengths were already checked to fit in a u8 on the wire
        let user_information = UserInformation::new(user, port, remote_address)
            .ok_or(DeserializeError::InvalidWireBytes)?;

        let arguments = deserialize_arguments(argument_lengths, &buffer[arguments_start..])?;

        Ok(Self {
            method,
            authentication_context: AuthenticationContext {
                privilege_level,
                authentication_type,
                service,
            },
            user_information,
            arguments,
        })
    }
}

/// The status of an authorization operation, as returned by the server.
#[repr(u8)]
#[derive(PartialEq, Eq, Debug, Clone, Copy, TryFromPrimitive)]
pub enum Status {
    /// Authorization passed; server may have additional arguments for the client.
    PassAdd = 0x01,

    /// Authorization passed; server provides argument values to override those provided in the request.
    PassReplace = 0x02,

    /// Authorization request was denied.
    Fail = 0x10,

    /// An error ocurred on the server.
    Error = 0x11,

    /// Forward authorization request to an alternative daemon.
    #[deprecated = "Forwarding to an alternative daemon was deprecated in RFC 8907."]
    Follow = 0x21,
}

/// The body of an authorization reply packet.
///
/// The status is kept as the raw byte sent by the server, since callers are expected
/// to report values outside the known set rather than reject the packet.
#[derive(Clone, Debug, PartialEq, Eq, Getters, CopyGetters)]
pub struct Reply {
    /// Gets the raw status byte returned in an authorization exchange.
    #[getset(get_copy = "pub")]
    status: u8,

    /// Gets the message sent by the server, to be displayed to the user.
    #[getset(get = "pub")]
    server_message: String,

    /// Gets the administrative log message returned from the server.
    #[getset(get = "pub")]
    data: String,

    /// Gets the arguments returned by the server, in wire order.
    ///
    /// These are kept as sent rather than parsed, so an attribute the client can't
    /// interpret still reaches the caller instead of invalidating the reply.
    #[getset(get = "pub")]
    arguments: Vec<String>,
}

impl Reply {
    const ARGUMENT_LENGTHS_START: usize = 6;

    /// Assembles an authorization reply from its fields.
    pub fn new(status: u8, server_message: String, data: String, arguments: Vec<String>) -> Self {
        Self {
            status,
            server_message,
            data,
            arguments,
        }
    }

    /// Interprets the raw status byte, if it is one defined by RFC 8907.
    pub fn known_status(&self) -> Option<Status> {
        Status::try_from(self.status).ok()
    }
}

impl PacketBody for Reply {
    const TYPE: PacketType = PacketType::Authorization;

    // 1 byte for status, 1 byte for argument count, 2 bytes each for lengths of server message/data
    const REQUIRED_FIELDS_LENGTH: usize = 1 + 1 + 4;

    // two u16-length messages and up to 255 arguments of at most 255 bytes
    const MAX_LENGTH: usize =
        Self::REQUIRED_FIELDS_LENGTH + 255 + 2 * u16::MAX as usize + 255 * 255;

    fn serialize_into(&self, buffer: &mut Vec<u8>) -> Result<(), SerializeError> {
        let argument_count = u8::try_from(self.arguments.len())
            .map_err(|_| SerializeError::TooManyArguments(self.arguments.len()))?;

        let mut lengths = [0; 4];
        NetworkEndian::write_u16(&mut lengths[..2], self.server_message.len().try_into()?);
        NetworkEndian::write_u16(&mut lengths[2..], self.data.len().try_into()?);

        buffer.extend([self.status, argument_count]);
        buffer.extend_from_slice(&lengths);
        for argument in &self.arguments {
            buffer.push(argument.len().try_into()?);
        }

        buffer.extend_from_slice(self.server_message.as_bytes());
        buffer.extend_from_slice(self.data.as_bytes());
        for argument in &self.arguments {
            buffer.extend_from_slice(argument.as_bytes());
        }

        Ok(())
    }

    fn deserialize_from(buffer: &[u8]) -> Result<Self, DeserializeError> {
        if buffer.len() < Self::REQUIRED_FIELDS_LENGTH {
            return Err(DeserializeError::UnexpectedEnd);
        }

        let status = buffer[0];
        let argument_count = buffer[1] as usize;
        let server_message_length = NetworkEndian::read_u16(&buffer[2..4]) as usize;
        let data_length = NetworkEndian::read_u16(&buffer[4..6]) as usize;

        let body_start = Self::ARGUMENT_LENGTHS_START + argument_count;
        let argument_lengths = buffer
            .get(Self::ARGUMENT_LENGTHS_START..body_start)
            .ok_or(DeserializeError::UnexpectedEnd)?;

        let expected = body_start
            + server_message_length
            + data_length
            + argument_lengths.iter().map(|&length| length as usize).sum::<usize>();

        // buffer is sliced to the header's body length, so this compares against that indirectly
        if expected != buffer.len() {
            return Err(DeserializeError::WrongBodyBufferSize {
                expected,
                buffer_size: buffer.len(),
            });
        }

        let data_start = body_start + server_message_length;
        let arguments_start = data_start + data_length;

        // reply text is only ever displayed, so anything undecodable is replaced rather than rejected
        let server_message = String::from_utf8_lossy(&buffer[body_start..data_start]).into_owned();
        let data = String::from_utf8_lossy(&buffer[data_start..arguments_start]).into_owned();

        let arguments = split_arguments(argument_lengths, &buffer[arguments_start..])
            .map(|raw_argument| String::from_utf8_lossy(raw_argument).into_owned())
            .collect();

        Ok(Self {
            status,
            server_message,
            data,
            arguments,
        })
    }
}

/// Splits contiguous encoded arguments according to their lengths.
///
/// Callers check that `values` holds exactly the sum of `lengths` bytes beforehand.
fn split_arguments<'buf>(
    lengths: &'buf [u8],
    values: &'buf [u8],
) -> impl Iterator<Item = &'buf [u8]> {
    lengths.iter().scan(0, move |argument_start: &mut usize, &length| {
        let start = *argument_start;
        *argument_start += length as usize;
        values.get(start..*argument_start)
    })
}

/// Splits and decodes request arguments, which must be well formed.
fn deserialize_arguments(lengths: &[u8], values: &[u8]) -> Result<Vec<Argument>, DeserializeError> {
    split_arguments(lengths, values)
        .map(|raw_argument| Argument::deserialize(raw_argument).map_err(DeserializeError::from))
        .collect()
}
