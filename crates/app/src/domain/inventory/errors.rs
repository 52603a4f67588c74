//! Inventory ledger errors.

use sqlx::Error;
use thiserror::Error;

use crate::domain::catalog::records::VariantUuid;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("variant not found")]
    VariantNotFound,

    #[error("insufficient stock for variant {variant}")]
    InsufficientStock { variant: VariantUuid },

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for InventoryError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::VariantNotFound;
        }

        Self::Sql(error)
    }
}
