//! The authorization workflow: one request, one reply.

use std::io::{self, Write};
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use tacplus_client::ArgumentFlags;

use crate::classify::Outcome;
use crate::profile::AuthorizationProfile;
use crate::transport::{Connector, Transport, TransportError};

/// Everything needed to run one authorization, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Method, type and service of the request.
    pub profile: AuthorizationProfile,

    /// The user being authorized.
    pub user: String,

    /// `attr=value` pairs, in the order they're sent.
    pub pairs: Vec<String>,

    /// Whether to report progress and returned attributes.
    pub verbose: bool,

    /// Configuration file for the transport, overriding its default.
    pub config_path: Option<PathBuf>,
}

/// A failed step of the workflow.
#[derive(Debug, Error)]
pub enum AuthorizeError {
    #[error("open session: {0}")]
    Open(#[source] TransportError),

    #[error("configure: {0}")]
    Configure(#[source] TransportError),

    #[error("create authorization: {0}")]
    Create(#[source] TransportError),

    #[error("set user: {0}")]
    SetUser(#[source] TransportError),

    #[error("add attribute {pair}: {source}")]
    AddAttribute {
        pair: String,
        source: TransportError,
    },

    #[error("send failed: {0}")]
    Send(#[source] TransportError),

    #[error("get attribute {index}: {source}")]
    GetAttribute {
        index: usize,
        source: TransportError,
    },

    #[error("writing output: {0}")]
    Output(#[from] io::Error),
}

/// Runs a complete authorization exchange and classifies the reply.
///
/// With `config.verbose` set, a passing outcome and each returned attribute are written to
/// `report`. Non-passing outcomes are returned for the caller to report. The session is
/// dropped, and so released, before this returns on every path.
pub fn run_authorization<C, W>(
    connector: &C,
    config: &Config,
    report: &mut W,
) -> Result<Outcome, AuthorizeError>
where
    C: Connector,
    W: Write,
{
    let mut session = connector.open().map_err(AuthorizeError::Open)?;
    debug!("session opened");

    session
        .configure(config.config_path.as_deref())
        .map_err(AuthorizeError::Configure)?;

    session
        .create_authorization(&config.profile)
        .map_err(AuthorizeError::Create)?;
    session
        .set_user(&config.user)
        .map_err(AuthorizeError::SetUser)?;

    for pair in &config.pairs {
        // flags left empty: each pair's own delimiter decides whether it's mandatory
        session
            .add_attribute(ArgumentFlags::empty(), pair)
            .map_err(|source| AuthorizeError::AddAttribute {
                pair: pair.clone(),
                source,
            })?;
    }

    debug!(user = %config.user, pairs = config.pairs.len(), "sending request");
    let result = session.send().map_err(AuthorizeError::Send)?;

    let outcome = Outcome::classify(result.status());
    debug!(%outcome, attributes = result.argument_count(), "reply classified");

    if outcome.is_pass() && config.verbose {
        writeln!(report, "{outcome}")?;

        for index in 0..result.argument_count() {
            let attribute = session
                .attribute(index)
                .map_err(|source| AuthorizeError::GetAttribute { index, source })?;
            writeln!(report, "{index:2} {attribute}")?;
        }
    }

    Ok(outcome)
}
