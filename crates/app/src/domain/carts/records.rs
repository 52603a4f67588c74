//! Cart Records

use jiff::Timestamp;

use crate::{
    domain::catalog::records::{ProductUuid, VariantUuid},
    sessions::GuestSessionUuid,
    uuids::TypedUuid,
};

/// Cart Line UUID
pub type CartLineUuid = TypedUuid<CartLineRecord>;

/// Cart Line Record
///
/// At most one row exists per `(session, variant)` pair; repeated adds merge
/// into the existing row's quantity.
#[derive(Debug, Clone)]
pub struct CartLineRecord {
    pub uuid: CartLineUuid,
    pub session_uuid: GuestSessionUuid,
    pub variant_uuid: VariantUuid,
    pub quantity: u32,
    pub added_at: Timestamp,
}

/// Cart line joined with catalog display data.
#[derive(Debug, Clone)]
pub struct CartLineDetails {
    pub uuid: CartLineUuid,
    pub variant_uuid: VariantUuid,
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub color_name: String,
    pub color_hex: String,
    pub size_label: String,
    pub unit_price: u64,
    pub quantity: u32,
    pub stock: u64,
    pub added_at: Timestamp,
}

impl CartLineDetails {
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.unit_price * u64::from(self.quantity)
    }
}

/// Cart line joined with live variant pricing, as the checkout reads it.
#[derive(Debug, Clone)]
pub struct PricedCartLine {
    pub variant_uuid: VariantUuid,
    pub quantity: u32,
    pub unit_price: u64,
    pub stock: u64,
}

impl PricedCartLine {
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.unit_price * u64::from(self.quantity)
    }
}
