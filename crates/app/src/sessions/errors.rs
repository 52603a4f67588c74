//! Session errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session store is read-only in this context")]
    ReadOnly,

    #[error("session store rejected the write")]
    Rejected(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Debug, Error)]
pub enum SessionError {
    /// A session-creating operation ran in a context that cannot emit
    /// outbound state. This is a programming error at the call site, not
    /// ordinary contention.
    #[error("cannot issue a guest session from a read-only context")]
    ReadOnlyContext,

    #[error("session store rejected the write")]
    Store(#[source] SessionStoreError),
}

impl From<SessionStoreError> for SessionError {
    fn from(error: SessionStoreError) -> Self {
        match error {
            SessionStoreError::ReadOnly => Self::ReadOnlyContext,
            other => Self::Store(other),
        }
    }
}
