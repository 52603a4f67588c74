//! Order Data

use serde::Serialize;

use crate::domain::orders::records::OrderUuid;

/// Contact details captured on the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderContact {
    pub name: String,
    pub phone: String,
    pub city: String,
    pub address: String,
}

/// The shipping option the shopper selected; its cost is captured on the
/// order at creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingOption {
    pub label: String,
    pub cost: u64,
}

/// What checkout hands back on success.
#[derive(Debug, Clone, Serialize)]
pub struct PlacedOrder {
    pub uuid: OrderUuid,
    pub ref_code: String,
    pub subtotal: u64,
    pub total: u64,
}
