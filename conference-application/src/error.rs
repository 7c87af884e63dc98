use conference_domain::{FetchError, ImportError, PersistenceError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<PersistenceError> for AppError {
    fn from(value: PersistenceError) -> Self {
        AppError::Import(ImportError::Persistence(value))
    }
}
