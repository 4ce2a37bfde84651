use std::fmt;

use tacplus_protocol::authorization::Status;


/// What an authorization reply's status means for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Authorized; returned attributes add to those requested.
    PassAdd,

    /// Authorized; returned attributes replace those requested.
    PassReplace,

    /// Not authorized.
    Fail,

    /// The server reported an error.
    Error,

    /// Any other status byte, including the deprecated FOLLOW.
    Unrecognized(u8),
}

impl Outcome {
    /// Maps a raw reply status to an outcome. Every byte maps to exactly one outcome.
    pub fn classify(status: u8) -> Self {
        match Status::try_from(status) {
            Ok(Status::PassAdd) => Self::PassAdd,
            Ok(Status::PassReplace) => Self::PassReplace,
            Ok(Status::Fail) => Self::Fail,
            Ok(Status::Error) => Self::Error,
            _ => Self::Unrecognized(status),
        }
    }

    /// Whether the request was authorized.
    pub fn is_pass(self) -> bool {
        matches!(self, Self::PassAdd | Self::PassReplace)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PassAdd => write!(f, "authorization passed (add)"),
            Self::PassReplace => write!(f, "authorization passed (replace)"),
            Self::Fail => write!(f, "authorization failed"),
            Self::Error => write!(f, "server error"),
            Self::Unrecognized(status) => write!(f, "unrecognized server response: {status:#x}"),
        }
    }
}
