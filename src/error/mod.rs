use crate::batch::BatchError;
use crate::prepare::PrepareError;
use crate::workspace::WorkspaceError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

/// Failures that abort the session. Per-image problems (unreadable sources,
/// failed crops) are handled where they occur and never reach this level.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    #[error(transparent)]
    Prepare(#[from] PrepareError),
    #[error(transparent)]
    Batch(#[from] BatchError),
}
