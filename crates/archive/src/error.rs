use gameci_process::ProcessError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error(transparent)]
    Process(#[from] ProcessError),
}
