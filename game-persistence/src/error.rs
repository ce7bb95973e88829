use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The stored record exists but cannot be trusted.
    #[error("corrupt persisted stats: {0}")]
    CorruptPersistedStats(String),
    #[error("stats storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl From<sea_orm::DbErr> for PersistenceError {
    fn from(err: sea_orm::DbErr) -> Self {
        PersistenceError::Storage(err.into())
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        PersistenceError::Storage(err.into())
    }
}
