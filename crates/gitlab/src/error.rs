//! GitLab wrapper error types.

use gameci_process::ProcessError;

/// Errors produced by the glab wrapper and release helpers.
#[derive(Debug, thiserror::Error)]
pub enum GitLabError {
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// glab exited non-zero. Captured output is in the message already
    /// logged; the args identify which call failed.
    #[error("glab failed (exit {exit_code}) for args {args:?}")]
    CommandFailed {
        args: Vec<String>,
        exit_code: i32,
        stdout: String,
        stderr: String,
    },

    /// glab exited zero but its stderr carried an HTTP error from the API.
    #[error("glab API error: {message} ({http_status})")]
    Api { message: String, http_status: String },

    #[error("unexpected glab output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("package version is not semver: {0}")]
    Version(#[from] semver::Error),
}
