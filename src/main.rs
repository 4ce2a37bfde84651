use std::io;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use tacplus::transport::ClientConnector;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let status = tacplus::run(std::env::args_os(), &ClientConnector, &mut io::stderr());
    ExitCode::from(status)
}
