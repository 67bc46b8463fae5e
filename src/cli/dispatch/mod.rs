//! Map parsed command-line arguments to the action the binary runs.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{ARG_CORS_ORIGIN, ARG_PORT};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if the CORS origin is not a usable URL.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);

    let cors_origin = matches
        .get_one::<String>(ARG_CORS_ORIGIN)
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty());

    // fail at startup rather than on the first cross-origin request
    if let Some(origin) = &cors_origin {
        crate::api::frontend_origin(origin)?;
    }

    Ok(Action::Server(Args { port, cors_origin }))
}
