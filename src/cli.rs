//! Command-line parsing.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use thiserror::Error;

use tacplus_protocol::{AuthenticationMethod, AuthenticationService, AuthenticationType};

use crate::authorize::Config;
use crate::profile::AuthorizationProfile;
use crate::symbols::{self, SymbolTable, METHODS, SERVICES, TYPES};


const USAGE: &str =
    "tacplus [-v] [-c config] [-m method] [-s service] [-t type] [attr=value ...] name";

/// Perform a TACACS+ authorization request for a user.
#[derive(Debug, Parser)]
#[command(name = "tacplus", override_usage = USAGE, after_help = value_lists())]
pub struct Cli {
    /// Report progress and returned attributes on standard error
    #[arg(short)]
    pub verbose: bool,

    /// Configuration file [default: $TACPLUS_CONF, or /etc/tacplus.conf]
    #[arg(short = 'c', value_name = "config")]
    pub config: Option<PathBuf>,

    /// Authentication method
    #[arg(short = 'm', value_name = "method", default_value = "notset", value_parser = parse_method)]
    pub method: AuthenticationMethod,

    /// Authorization service
    #[arg(short = 's', value_name = "service", default_value = "none", value_parser = parse_service)]
    pub service: AuthenticationService,

    /// Authentication type
    #[arg(short = 't', value_name = "type", default_value = "notset", value_parser = parse_type)]
    pub authentication_type: AuthenticationType,

    /// Attribute-value pairs to send, followed by the user name
    ///
    /// Options are only recognized before the first of these.
    #[arg(
        value_name = "attr=value ... name",
        required = true,
        num_args = 1..,
        trailing_var_arg = true
    )]
    pub arguments: Vec<String>,
}

/// Why the command line couldn't be turned into a [`Config`].
#[derive(Debug, Error)]
pub enum UsageError {
    /// Rejected by the argument parser, including requests for help.
    #[error(transparent)]
    Parse(#[from] clap::Error),

    /// A positional argument before the user name had no `=`.
    #[error("attribute {0:?} is not of the form attr=value")]
    MalformedPair(String),
}

impl UsageError {
    /// Whether this is a requested help message rather than a mistake.
    pub fn is_help(&self) -> bool {
        matches!(self, Self::Parse(error) if !error.use_stderr())
    }

    /// The full text to show: the diagnostic, usage line and the accepted names.
    pub fn render(&self) -> String {
        let mut text = match self {
            Self::Parse(error) => error.render().to_string(),
            Self::MalformedPair(_) => {
                format!("tacplus: {self}\n\n{}\n", Cli::command().render_usage())
            }
        };

        if !self.is_help() {
            text.push('\n');
            text.push_str(&value_lists());
        }

        text
    }
}

fn lookup_or_list<T: Copy>(table: &SymbolTable<T>, axis: &str, name: &str) -> Result<T, String> {
    symbols::lookup(table, name).ok_or_else(|| {
        format!(
            "unknown {axis} {name:?} (expected one of: {})",
            symbols::name_list(table)
        )
    })
}

fn parse_method(name: &str) -> Result<AuthenticationMethod, String> {
    lookup_or_list(METHODS, "method", name)
}

fn parse_service(name: &str) -> Result<AuthenticationService, String> {
    lookup_or_list(SERVICES, "service", name)
}

fn parse_type(name: &str) -> Result<AuthenticationType, String> {
    lookup_or_list(TYPES, "type", name)
}

/// Lists the accepted method, service and type names.
pub fn value_lists() -> String {
    format!(
        "method  = {}\nservice = {}\ntype    = {}\n",
        symbols::name_list(METHODS),
        symbols::name_list(SERVICES),
        symbols::name_list(TYPES)
    )
}

impl TryFrom<Cli> for Config {
    type Error = UsageError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let mut pairs = cli.arguments;

        // clap requires at least one positional, so there's always a user
        let user = pairs.pop().unwrap_or_default();

        if let Some(malformed) = pairs.iter().find(|pair| !pair.contains('=')) {
            return Err(UsageError::MalformedPair(malformed.clone()));
        }

        Ok(Config {
            profile: AuthorizationProfile {
                method: cli.method,
                authentication_type: cli.authentication_type,
                service: cli.service,
            },
            user,
            pairs,
            verbose: cli.verbose,
            config_path: cli.config,
        })
    }
}

/// Parses process arguments (including the program name) into a [`Config`].
pub fn parse<I, T>(args: I) -> Result<Config, UsageError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args)?;
    Config::try_from(cli)
}
