//! The boundary between the authorization workflow and the TACACS+ client library.

use std::path::Path;

use thiserror::Error;

use tacplus_client::{ArgumentFlags, AuthorizationResult, Session};

use crate::profile::AuthorizationProfile;

/// An error reported by a transport, carrying its own message.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(Box<dyn std::error::Error + Send + Sync>);

impl TransportError {
    /// Wraps any error (or message) from a transport.
    pub fn new(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(error.into())
    }
}

/// Opens sessions with a TACACS+ transport.
pub trait Connector {
    /// The session type handed out; dropping it releases the session.
    type Session: Transport;

    /// Acquires a new, unconfigured session.
    fn open(&self) -> Result<Self::Session, TransportError>;
}

/// A single authorization session.
pub trait Transport {
    /// Loads server configuration, from `path` if given or the transport's default location.
    fn configure(&mut self, path: Option<&Path>) -> Result<(), TransportError>;

    /// Starts an authorization request under `profile`.
    fn create_authorization(&mut self, profile: &AuthorizationProfile)
        -> Result<(), TransportError>;

    /// Sets the user being authorized.
    fn set_user(&mut self, user: &str) -> Result<(), TransportError>;

    /// Appends an encoded attribute-value pair to the request.
    fn add_attribute(&mut self, flags: ArgumentFlags, pair: &str) -> Result<(), TransportError>;

    /// Sends the request and waits for the reply.
    fn send(&mut self) -> Result<AuthorizationResult, TransportError>;

    /// Fetches the reply attribute at `index`.
    fn attribute(&mut self, index: usize) -> Result<String, TransportError>;
}

/// Opens [`tacplus_client::Session`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClientConnector;

impl Connector for ClientConnector {
    type Session = Session;

    fn open(&self) -> Result<Session, TransportError> {
        Ok(Session::new())
    }
}

impl Transport for Session {
    fn configure(&mut self, path: Option<&Path>) -> Result<(), TransportError> {
        Session::configure(self, path).map_err(TransportError::new)
    }

    fn create_authorization(
        &mut self,
        profile: &AuthorizationProfile,
    ) -> Result<(), TransportError> {
        Session::create_authorization(
            self,
            profile.method,
            profile.authentication_type,
            profile.service,
        );
        Ok(())
    }

    fn set_user(&mut self, user: &str) -> Result<(), TransportError> {
        Session::set_user(self, user).map_err(TransportError::new)
    }

    fn add_attribute(&mut self, flags: ArgumentFlags, pair: &str) -> Result<(), TransportError> {
        self.add_argument(flags, pair).map_err(TransportError::new)
    }

    fn send(&mut self) -> Result<AuthorizationResult, TransportError> {
        Session::send(self).map_err(TransportError::new)
    }

    fn attribute(&mut self, index: usize) -> Result<String, TransportError> {
        self.argument(index).map_err(TransportError::new)
    }
}
