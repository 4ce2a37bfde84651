use getset::Getters;
use num_enum::TryFromPrimitive;

use crate::FieldText;

use super::SerializeError;

#[cfg(test)]
mod tests;

/// The method used to authenticate to the TACACS+ client.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, TryFromPrimitive)]
pub enum AuthenticationMethod {
    /// Unknown.
    NotSet = 0x00,

    /// No authentication performed.
    None = 0x01,

    /// Kerberos version 5
    Kerberos5 = 0x02,

    /// Fixed password associated with access line
    Line = 0x03,

    /// Granting new privileges (similar to `su(1)`)
    Enable = 0x04,

    /// Client-local user database
    Local = 0x05,

    /// The TACACS+ protocol itself.
    TacacsPlus = 0x06,

    /// (Unqualified) guest authentication
    Guest = 0x08,

    /// RADIUS (RFC 3579)
    Radius = 0x10,

    /// Kerberos version 4
    Kerberos4 = 0x11,

    /// r-command, like `rlogin(1)`
    RCommand = 0x20,
}

/// A privilege level for authorization. Limited to the range 0-15, inclusive.
#[repr(transparent)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash, Default)]
pub struct PrivilegeLevel(u8);

impl PrivilegeLevel {
    /// Converts an integer to a `PrivilegeLevel` if it is in the proper range (0-15).
    ///
    /// # Examples
    /// ```
    /// use tacplus_protocol::PrivilegeLevel;
    ///
    /// assert!(PrivilegeLevel::new(15).is_some());
    /// assert!(PrivilegeLevel::new(42).is_none());
    /// ```
    pub fn new(level: u8) -> Option<Self> {
        if level <= 15 {
            Some(Self(level))
        } else {
            None
        }
    }
}

/// Types of authentication supported by the TACACS+ protocol.
///
/// *Note:* TACACS+ as a protocol does not meet modern standards of security; access to the data lines must be protected. See [RFC-8907 Section 10.1]
///
/// [RFC-8907 Section 10.1]: https://datatracker.ietf.org/doc/html/rfc8907#section-10.1.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum AuthenticationType {
    /// Authentication type not set, typically when it's not available to the client.
    NotSet = 0x00,

    /// Plain text username & password exchange.
    Ascii = 0x01,

    /// The Password Authentication Protocol, as specified by [RFC-1334](https://www.rfc-editor.org/rfc/rfc1334.html).
    Pap = 0x02,

    /// The Challenge-Handshake Authentication Protocol, also specified in [RFC-1334](https://www.rfc-editor.org/rfc/rfc1334.html).
    Chap = 0x03,

    /// AppleTalk Remote Access Protocol.
    Arap = 0x04,

    /// Version 1 of Microsoft's CHAP extension.
    MsChap = 0x05,

    /// Version 2 of Microsoft's CHAP extension.
    MsChapV2 = 0x06,
}

/// A TACACS+ authentication service. Most of these values are only kept for backwards compatibility.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum AuthenticationService {
    /// No service.
    None = 0x00,

    /// Regular login to a client device.
    Login = 0x01,

    /// Request for a change in privileges, similar to the functionality of `su(1)`.
    Enable = 0x02,

    /// Point-to-Point Protocol
    Ppp = 0x03,

    /// AppleTalk Remote Access Protocol.
    Arap = 0x04,

    /// PT service (the acronym is not expanded by RFC8907).
    Pt = 0x05,

    /// Authentication from the r-command suite, e.g. via `rlogin(1)`.
    RCommand = 0x06,

    /// [X.25 suite](https://en.wikipedia.org/wiki/X.25)
    X25 = 0x07,

    /// NetWare Asynchronous Support Interface
    Nasi = 0x08,

    /// Firewall proxy
    FwProxy = 0x09,
}

/// Some authentication information about a request, sent or received from a server.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct AuthenticationContext {
    /// The privilege level of the request.
    pub privilege_level: PrivilegeLevel,

    /// The method used to authenticate to the TACACS+ client.
    pub authentication_type: AuthenticationType,

    /// The service used to authenticate to the TACACS+ client.
    pub service: AuthenticationService,
}

impl AuthenticationContext {
    /// Size of authentication context information on the wire, in bytes.
    pub(super) const WIRE_SIZE: usize = 3;

    /// Appends authentication context information to a packet body "header."
    pub(super) fn serialize(&self, buffer: &mut Vec<u8>) {
        buffer.extend([
            self.privilege_level.0,
            self.authentication_type as u8,
            self.service as u8,
        ]);
    }
}

/// Some information about the user connected to a TACACS+ client.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Getters)]
pub struct UserInformation {
    /// The user performing the action that is connected to the client.
    #[getset(get = "pub")]
    user: String,

    /// The port the user is connected to.
    #[getset(get = "pub")]
    port: FieldText,

    /// The remote address that the user is connecting from.
    #[getset(get = "pub")]
    remote_address: FieldText,
}

impl UserInformation {
    /// Bundles together information about a TACACS+ client user, checking that all fields fit on the wire.
    ///
    /// `user` can be any (UTF-8) string, but `port` and `remote_address` must be valid ASCII.
    /// All three fields must also be at most 255 bytes long (i.e., `u8::MAX`).
    pub fn new(user: String, port: FieldText, remote_address: FieldText) -> Option<Self> {
        if u8::try_from(user.len()).is_ok()
            && u8::try_from(port.len()).is_ok()
            && u8::try_from(remote_address.len()).is_ok()
        {
            Some(Self {
                user,
                port,
                remote_address,
            })
        } else {
            None
        }
    }

    /// Appends the lengths of the contained fields in the proper order, as done in the "header" of a client-sent packet body.
    pub(super) fn serialize_field_lengths(
        &self,
        buffer: &mut Vec<u8>,
    ) -> Result<(), SerializeError> {
        buffer.push(self.user.len().try_into()?);
        buffer.push(self.port.len().try_into()?);
        buffer.push(self.remote_address.len().try_into()?);
        Ok(())
    }

    /// Appends the field values contiguously, as their lengths are stored elsewhere.
    pub(super) fn serialize_field_values(&self, buffer: &mut Vec<u8>) {
        buffer.extend_from_slice(self.user.as_bytes());
        buffer.extend_from_slice(self.port.as_bytes());
        buffer.extend_from_slice(self.remote_address.as_bytes());
    }
}
