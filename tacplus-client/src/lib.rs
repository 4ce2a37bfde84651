//! # tacplus-client
//!
//! A blocking TACACS+ ([RFC8907](https://www.rfc-editor.org/rfc/rfc8907)) authorization client.
//!
//! A [`Session`] reads its server list from a `tacplus.conf`-style file (see [`config`]),
//! accumulates a single authorization request and sends it, trying each configured
//! server in order until one answers.
//!
//! ```no_run
//! use tacplus_client::protocol::{AuthenticationMethod, AuthenticationService, AuthenticationType};
//! use tacplus_client::{ArgumentFlags, Session};
//!
//! # fn main() -> Result<(), tacplus_client::ClientError> {
//! let mut session = Session::new();
//! session.configure(None)?;
//!
//! session.create_authorization(
//!     AuthenticationMethod::TacacsPlus,
//!     AuthenticationType::Ascii,
//!     AuthenticationService::Login,
//! );
//! session.set_user("alice")?;
//! session.add_argument(ArgumentFlags::empty(), "service=shell")?;
//!
//! let result = session.send()?;
//! for index in 0..result.argument_count() {
//!     println!("{}", session.argument(index)?);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub use config::ServerConfig;

mod error;
pub use error::ClientError;

mod inner;

mod response;
pub use response::AuthorizationResult;

mod session;
pub use session::Session;

// reexported for ease of access
pub use tacplus_protocol as protocol;
pub use tacplus_protocol::ArgumentFlags;
