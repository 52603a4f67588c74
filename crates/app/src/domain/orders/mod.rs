//! Orders
//!
//! Checkout is the one place where cart, catalog, and inventory state meet:
//! converting a cart into an order, capturing per-item purchase prices, and
//! decrementing stock happen inside a single transaction or not at all.

pub mod data;
pub mod errors;
pub mod records;
pub mod ref_code;
mod repositories;
pub mod service;

pub use errors::OrdersServiceError;
pub use service::*;
