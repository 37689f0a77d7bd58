use thiserror::Error;

/// Errors that can cross the pipeline boundary.
///
/// Only malformed caller input is a real error; fetch failures, bot
/// blocks, and parse failures all resolve to a normal [`lotscout_core::Resolution`]
/// with diagnostics describing the problem.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid listing URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("empty listing text")]
    EmptyText,

    #[error("HTTP client construction failed: {0}")]
    ClientBuild(#[from] reqwest::Error),
}
