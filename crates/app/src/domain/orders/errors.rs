//! Orders service errors.

use sqlx::Error;
use thiserror::Error;

use crate::domain::{catalog::records::VariantUuid, orders::records::OrderStatus};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("cart is empty")]
    EmptyCart,

    /// Validation found a line whose quantity exceeds current stock.
    #[error("insufficient stock for variant {variant}")]
    InsufficientStock { variant: VariantUuid },

    /// Stock moved between validation and commit; the whole order rolled
    /// back. Not retried automatically.
    #[error("stock changed during checkout for variant {variant}")]
    StockConflict { variant: VariantUuid },

    #[error("could not allocate a unique order reference")]
    RefCodeExhausted,

    #[error("order not found")]
    NotFound,

    #[error("order status cannot change from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        Self::Sql(error)
    }
}
