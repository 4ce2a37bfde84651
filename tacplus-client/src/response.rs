use tacplus_protocol::authorization::{Reply, Status};

/// Summary of an authorization reply, as returned by [`Session::send`](super::Session::send).
///
/// The full reply stays in the session; arguments are fetched from there by index.
#[must_use = "Authorization failure is not reported as an error, so the status must be checked."]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationResult {
    status: u8,
    argument_count: usize,
}

impl AuthorizationResult {
    /// Bundles a raw status byte with the number of returned arguments.
    pub fn new(status: u8, argument_count: usize) -> Self {
        Self {
            status,
            argument_count,
        }
    }

    /// The raw status byte sent by the server.
    pub fn status(&self) -> u8 {
        self.status
    }

    /// The status, if it's one defined by RFC 8907.
    pub fn known_status(&self) -> Option<Status> {
        Status::try_from(self.status).ok()
    }

    /// How many arguments the server returned.
    pub fn argument_count(&self) -> usize {
        self.argument_count
    }
}

impl From<&Reply> for AuthorizationResult {
    fn from(reply: &Reply) -> Self {
        Self::new(reply.status(), reply.arguments().len())
    }
}
