//! Process execution error types.

/// Errors produced while running an external tool.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// The caller passed an empty argument vector. Nothing was spawned.
    #[error("empty command")]
    EmptyCommand,

    /// The executable could not be started (missing binary, permissions).
    /// Distinct from [`ProcessError::NonZeroExit`]: the process never ran.
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran and returned a non-zero exit code, and the caller
    /// did not opt in to tolerate it. The output captured up to that point
    /// is carried along for diagnostics.
    #[error("{program} exited with code {exit_code}")]
    NonZeroExit {
        program: String,
        exit_code: i32,
        stdout: String,
        stderr: String,
    },

    /// I/O failure while draining a stream or writing log files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
