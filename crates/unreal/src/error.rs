//! Engine wrapper error types.

use gameci_process::ProcessError;

/// Errors produced while locating or driving an Unreal Engine install.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// No installation found for the requested version. Set `UE_<version>_DIR`
    /// or install the engine into the default Epic Games directory.
    #[error("Unreal Engine {version} not found (set UE_{version}_DIR or install to {fallback})")]
    NotFound { version: String, fallback: String },

    /// A directory was found but does not look like an engine root.
    #[error("{root} is not a valid Unreal Engine install: missing {missing}")]
    InvalidInstall { root: String, missing: String },

    #[error(transparent)]
    Process(#[from] ProcessError),
}
