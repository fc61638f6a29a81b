//! Process-level composition: arguments in, exit status out.

use std::ffi::OsString;
use std::io::Write;

use tracing::{debug, warn};

use crate::cancel::CancellationToken;
use crate::cli::{build_request, help_text};
use crate::config::AppConfig;
use crate::engine::DecodeEngine;
use crate::error::{ErrorCode, SacdError};
use crate::orchestrator::Orchestrator;

/// Exit status for success, including a user-cancelled conversion.
pub const EXIT_SUCCESS: u8 = 0;

/// Exit status for every failure.
pub const EXIT_FAILURE: u8 = 1;

/// Returns the banner printed before the source is opened.
pub fn banner() -> String {
    format!(
        "\n\nOdio SACD v{}\n--------------------\nCommand-line decoder\n\n",
        env!("CARGO_PKG_VERSION")
    )
}

fn print_usage_error<W: Write>(out: &mut W, error: &SacdError) {
    let help = help_text();
    let headline = error.code.description();
    let written = match error.code {
        ErrorCode::InvalidSampleRate => write!(out, "\nPANIC: {}\n{}", headline, help),
        _ => write!(out, "\nPANIC: {}\n{}\n", headline, help),
    };
    written.and_then(|()| out.flush()).ok();
}

/// Runs one invocation and returns its exit status.
///
/// `args` includes the program name. Usage errors are reported before the
/// engine is touched.
pub fn run<I, T, E, W>(
    args: I,
    config: &AppConfig,
    engine: E,
    token: &CancellationToken,
    out: &mut W,
) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    E: DecodeEngine,
    W: Write,
{
    let request = match build_request(args) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Rejected command line");
            print_usage_error(out, &e);
            return EXIT_FAILURE;
        }
    };
    debug!(?request, "Parsed request");

    if config.banner {
        write!(out, "{}", banner()).ok();
    }

    let mut orchestrator = Orchestrator::new(engine, token.clone(), &mut *out);
    match orchestrator.run(&request) {
        Ok(_) => EXIT_SUCCESS,
        Err(_) => EXIT_FAILURE,
    }
}
