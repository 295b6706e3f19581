use thiserror::Error;

use crate::config::API_KEY_VAR;

/// The two failure kinds the interactive loop reports to the user. Both are
/// returned as values; neither terminates the loop.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{} is not set; export it or add it to a .env file", API_KEY_VAR)]
    MissingCredential,

    /// Any failure from the remote collaborator: connect errors, timeouts,
    /// non-success statuses, malformed response bodies.
    #[error("chat request failed: {0:#}")]
    Upstream(anyhow::Error),
}
