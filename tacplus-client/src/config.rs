//! Server configuration, as read from a `tacplus.conf` file.
//!
//! Each non-comment line names one server:
//!
//! ```text
//! # host[:port]    secret                 [timeout [single-connection]]
//! tacacs.example   "a long shared secret" 5
//! 10.0.0.2:4949    s3cr3t                 3       single-connection
//! ```
//!
//! Fields are separated by whitespace. A field may be double-quoted to include
//! whitespace, in which case `\"` and `\\` are unescaped. Blank lines and lines
//! starting with `#` are ignored. An empty secret (`""`) disables obfuscation.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;


/// Path read when neither an explicit path nor [`PATH_ENV`] is given.
pub const DEFAULT_PATH: &str = "/etc/tacplus.conf";

/// Environment variable overriding [`DEFAULT_PATH`].
pub const PATH_ENV: &str = "TACPLUS_CONF";

/// The TACACS+ port registered with IANA.
pub const DEFAULT_PORT: u16 = 49;

/// Timeout used when a server line doesn't specify one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Maximum number of servers in a session.
pub const MAX_SERVERS: usize = 10;

const SINGLE_CONNECTION_OPTION: &str = "single-connection";

/// Connection settings for one TACACS+ server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host name or IP address of the server.
    pub host: String,

    /// TCP port the server listens on.
    pub port: u16,

    /// Shared secret for body obfuscation; empty means packets are sent in the clear.
    pub secret: String,

    /// How long a complete exchange with this server may take.
    pub timeout: Duration,

    /// Whether to ask the server to keep the connection open for later sessions.
    pub single_connection: bool,
}

impl ServerConfig {
    /// Creates a server configuration with the default port and timeout.
    pub fn new(host: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            secret: secret.into(),
            timeout: DEFAULT_TIMEOUT,
            single_connection: false,
        }
    }

    /// The key to obfuscate packets with, if any.
    pub fn obfuscation_key(&self) -> Option<&[u8]> {
        if self.secret.is_empty() {
            None
        } else {
            Some(self.secret.as_bytes())
        }
    }
}

impl fmt::Display for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// An error loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file couldn't be read.
    #[error("{}: {source}", .path.display())]
    Read {
        /// Path of the configuration file.
        path: PathBuf,

        /// The underlying error.
        source: io::Error,
    },

    /// A line of the file was malformed.
    #[error("{}:{line}: {reason}", .path.display())]
    Syntax {
        /// Path of the configuration file.
        path: PathBuf,

        /// 1-based line number.
        line: usize,

        /// What was wrong with the line.
        reason: SyntaxError,
    },
}

/// Reasons a configuration line is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// A quoted field had no closing quote.
    #[error("unterminated quoted string")]
    UnterminatedQuote,

    /// The line named a server but no secret.
    #[error("no shared secret given")]
    MissingSecret,

    /// The host part of the first field was empty or malformed.
    #[error("invalid host {0:?}")]
    InvalidHost(String),

    /// The port wasn't a number in 1-65535.
    #[error("invalid port {0:?}")]
    InvalidPort(String),

    /// The timeout wasn't a positive number of seconds.
    #[error("invalid timeout {0:?}")]
    InvalidTimeout(String),

    /// The fourth field was something other than `single-connection`.
    #[error("unknown option {0:?}")]
    UnknownOption(String),

    /// More than four fields were given.
    #[error("too many fields")]
    TooManyFields,

    /// The line would exceed the server limit.
    #[error("more than {} servers configured", MAX_SERVERS)]
    TooManyServers,
}

/// Picks the configuration file to read: `explicit`, else `$TACPLUS_CONF`, else [`DEFAULT_PATH`].
pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => path.to_owned(),
        None => std::env::var_os(PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PATH)),
    }
}

/// Reads and parses a configuration file.
pub fn load(path: &Path) -> Result<Vec<ServerConfig>, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_owned(),
        source,
    })?;

    parse(&contents).map_err(|(line, reason)| ConfigError::Syntax {
        path: path.to_owned(),
        line,
        reason,
    })
}

/// Parses configuration file contents, returning the 1-based line number along with any error.
pub fn parse(contents: &str) -> Result<Vec<ServerConfig>, (usize, SyntaxError)> {
    let mut servers = Vec::new();

    for (index, line) in contents.lines().enumerate() {
        let line_number = index + 1;

        if let Some(server) = parse_line(line).map_err(|reason| (line_number, reason))? {
            if servers.len() == MAX_SERVERS {
                return Err((line_number, SyntaxError::TooManyServers));
            }
            servers.push(server);
        }
    }

    Ok(servers)
}

/// Parses a single line, returning `None` for blank lines and comments.
fn parse_line(line: &str) -> Result<Option<ServerConfig>, SyntaxError> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let fields = split_fields(trimmed)?;
    let mut fields = fields.into_iter();

    // trimmed line isn't empty, so there is always a first field
    let address = fields.next().unwrap_or_default();
    let (host, port) = split_host_port(&address)?;
    let secret = fields.next().ok_or(SyntaxError::MissingSecret)?;

    let timeout = match fields.next() {
        Some(field) => match field.parse::<u64>() {
            Ok(seconds) if seconds > 0 => Duration::from_secs(seconds),
            _ => return Err(SyntaxError::InvalidTimeout(field)),
        },
        None => DEFAULT_TIMEOUT,
    };

    let single_connection = match fields.next() {
        Some(field) if field == SINGLE_CONNECTION_OPTION => true,
        Some(field) => return Err(SyntaxError::UnknownOption(field)),
        None => false,
    };

    if fields.next().is_some() {
        return Err(SyntaxError::TooManyFields);
    }

    Ok(Some(ServerConfig {
        host,
        port,
        secret,
        timeout,
        single_connection,
    }))
}

/// Splits a line into whitespace-separated fields, honoring double quotes.
fn split_fields(line: &str) -> Result<Vec<String>, SyntaxError> {
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let Some(first) = chars.next() else {
            return Ok(fields);
        };

        let mut field = String::new();

        if first == '"' {
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\\') => match chars.next() {
                        Some(escaped) => field.push(escaped),
                        None => return Err(SyntaxError::UnterminatedQuote),
                    },
                    Some(c) => field.push(c),
                    None => return Err(SyntaxError::UnterminatedQuote),
                }
            }
        } else {
            field.push(first);
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                field.push(c);
            }
        }

        fields.push(field);
    }
}

/// Splits `host`, `host:port`, `[v6-address]` or `[v6-address]:port`.
///
/// A bare IPv6 address (more than one colon) is taken as a host with the default port.
fn split_host_port(address: &str) -> Result<(String, u16), SyntaxError> {
    let invalid_host = || SyntaxError::InvalidHost(address.to_owned());

    let (host, port) = if let Some(bracketed) = address.strip_prefix('[') {
        let (host, rest) = bracketed.split_once(']').ok_or_else(invalid_host)?;
        match rest {
            "" => (host, None),
            _ => (host, Some(rest.strip_prefix(':').ok_or_else(invalid_host)?)),
        }
    } else {
        match address.split_once(':') {
            Some((host, port)) if !port.contains(':') => (host, Some(port)),
            _ => (address, None),
        }
    };

    if host.is_empty() {
        return Err(invalid_host());
    }

    let port = match port {
        Some(port) => match port.parse::<u16>() {
            Ok(number) if number > 0 => number,
            _ => return Err(SyntaxError::InvalidPort(port.to_owned())),
        },
        None => DEFAULT_PORT,
    };

    Ok((host.to_owned(), port))
}
