//! Steam wrapper error types.

use gameci_process::ProcessError;

/// Errors produced by the steamcmd wrapper and the partner web API client.
#[derive(Debug, thiserror::Error)]
pub enum SteamError {
    /// The `steamcmd-2fa` helper failed to produce a login code.
    #[error("failed to obtain Steam 2FA code (exit {exit_code})")]
    TwoFactor { exit_code: i32, output: String },

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The partner API answered, but not with success.
    #[error("Steam partner API error ({status}): {message}")]
    Api { status: u16, message: String },
}
