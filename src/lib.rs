//! # tacplus
//!
//! A command-line client performing a single TACACS+ authorization.
//!
//! ```text
//! tacplus [-v] [-c config] [-m method] [-s service] [-t type] [attr=value ...] name
//! ```
//!
//! The command line is resolved into a [`Config`](authorize::Config), which
//! [`run_authorization`](authorize::run_authorization) carries through a
//! [`Transport`](transport::Transport) session. The reply status is mapped to an
//! [`Outcome`](classify::Outcome) that decides the exit status.

use std::ffi::OsString;
use std::io::Write;

pub mod authorize;
pub mod classify;
pub mod cli;
pub mod profile;
pub mod symbols;
pub mod transport;

use transport::Connector;

/// Exit status for an authorized request.
pub const EXIT_SUCCESS: u8 = 0;

/// Exit status for usage errors, transport errors and denied requests.
pub const EXIT_FAILURE: u8 = 1;

/// Runs the program with the given arguments, returning its exit status.
///
/// Diagnostics and verbose output go to `report`; only `-h` output goes to standard output.
pub fn run<I, T, C, W>(args: I, connector: &C, report: &mut W) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    C: Connector,
    W: Write,
{
    let config = match cli::parse(args) {
        Ok(config) => config,
        Err(error) if error.is_help() => {
            print!("{}", error.render());
            return EXIT_SUCCESS;
        }
        Err(error) => {
            // nothing more can be done if the report itself can't be written
            let _ = write!(report, "{}", error.render());
            return EXIT_FAILURE;
        }
    };

    let message = match authorize::run_authorization(connector, &config, report) {
        Ok(outcome) if outcome.is_pass() => return EXIT_SUCCESS,
        Ok(outcome) => outcome.to_string(),
        Err(error) => error.to_string(),
    };

    let _ = writeln!(report, "tacplus: {message}");
    EXIT_FAILURE
}
