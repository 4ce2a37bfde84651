use std::time::Duration;

use futures::io;
use thiserror::Error;

use tacplus_protocol as protocol;

use crate::config::{ConfigError, MAX_SERVERS};

/// An error during a TACACS+ exchange.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ClientError {
    /// An error occurred when connecting or reading/writing a packet.
    #[error(transparent)]
    IOError(#[from] io::Error),

    /// A server did not complete the exchange within its configured timeout.
    #[error("{server}: timed out after {:?}", .timeout)]
    Timeout {
        /// The server that timed out, as `host:port`.
        server: String,

        /// The timeout that was exceeded.
        timeout: Duration,
    },

    /// The configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No servers were configured before sending.
    #[error("no TACACS+ servers configured")]
    NoServers,

    /// More servers were added than a session supports.
    #[error("at most {} servers may be configured", MAX_SERVERS)]
    TooManyServers,

    /// Error when serializing a packet to the wire.
    #[error(transparent)]
    SerializeError(#[from] protocol::SerializeError),

    /// Invalid packet received from a server.
    #[error("invalid packet received from server: {0}")]
    InvalidPacketReceived(#[from] protocol::DeserializeError),

    /// An argument could not be encoded.
    #[error("invalid argument {argument:?}: {reason}")]
    InvalidArgument {
        /// The argument as it was supplied.
        argument: String,

        /// Why the argument was rejected.
        reason: protocol::InvalidArgument,
    },

    /// A port or remote address was not printable ASCII.
    #[error(transparent)]
    InvalidText(#[from] protocol::InvalidText),

    /// The user name was too long to fit in a packet.
    #[error("user name was longer than 255 bytes")]
    InvalidUser,

    /// A privilege level outside of 0-15 was supplied.
    #[error("privilege level {0} is outside of the range 0-15")]
    InvalidPrivilegeLevel(u8),

    /// Too many arguments were provided to fit in a packet.
    #[error("only up to 255 (i.e., `u8::MAX`) arguments fit in a packet")]
    TooManyArguments,

    /// Sequence number in reply did not match what was expected.
    #[error("sequence number mismatch: expected {expected}, got {actual}")]
    SequenceNumberMismatch {
        /// The packet sequence number expected from the server.
        expected: u8,
        /// The actual packet sequence number received from the server.
        actual: u8,
    },

    /// A request field was set before an authorization request was created.
    #[error("no authorization request has been created")]
    NoRequest,

    /// The request was sent without a user.
    #[error("no user set for authorization request")]
    UserNotSet,

    /// Reply data was requested before a reply was received.
    #[error("no reply has been received")]
    NoReply,

    /// An argument index past the end of the reply's arguments was requested.
    #[error("argument index {index} out of range, reply has {count} arguments")]
    ArgumentIndex {
        /// The requested index.
        index: usize,

        /// The number of arguments in the reply.
        count: usize,
    },
}

impl ClientError {
    /// Whether the error is specific to one server, so another server may still succeed.
    pub(crate) fn try_next_server(&self) -> bool {
        matches!(self, Self::IOError(_) | Self::Timeout { .. })
    }
}
