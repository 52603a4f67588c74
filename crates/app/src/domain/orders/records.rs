//! Order Records

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use jiff::Timestamp;
use serde::Serialize;
use thiserror::Error;

use crate::{
    domain::catalog::records::VariantUuid, sessions::GuestSessionUuid, uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItemRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether `next` is a legal successor of this status.
    ///
    /// `pending -> shipped | cancelled`, `shipped -> delivered`; delivered
    /// and cancelled are terminal.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Shipped | Self::Cancelled) | (Self::Shipped, Self::Delivered)
        )
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unrecognized order status")]
pub struct ParseOrderStatusError;

impl FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseOrderStatusError),
        }
    }
}

/// Order Record
///
/// Immutable once placed, except for `status`. No total is stored; it is
/// recomputed from the items and shipping cost on every read.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub ref_code: String,
    pub session_uuid: GuestSessionUuid,
    pub name: String,
    pub phone: String,
    pub city: String,
    pub address: String,
    pub shipping_label: String,
    pub shipping_cost: u64,
    pub status: OrderStatus,
    pub created_at: Timestamp,
    pub items: Vec<OrderItemRecord>,
}

impl OrderRecord {
    /// Sum of the captured item prices.
    #[must_use]
    pub fn subtotal(&self) -> u64 {
        self.items.iter().map(OrderItemRecord::line_total).sum()
    }

    /// Subtotal plus shipping.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.subtotal() + self.shipping_cost
    }
}

/// Order Item Record
///
/// `unit_price_at_purchase` is a snapshot taken at checkout; later catalog
/// price changes never reach it.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItemRecord {
    pub uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    pub variant_uuid: VariantUuid,
    pub quantity: u32,
    pub unit_price_at_purchase: u64,
}

impl OrderItemRecord {
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.unit_price_at_purchase * u64::from(self.quantity)
    }
}

/// Order Summary
///
/// One row of a session's order history; the total is recomputed from the
/// items at query time.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub uuid: OrderUuid,
    pub ref_code: String,
    pub status: OrderStatus,
    pub created_at: Timestamp,
    pub total: u64,
    pub items_count: u64,
}
