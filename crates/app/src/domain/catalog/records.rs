//! Catalog Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    pub base_price: u64,
    /// Carried opaquely for display; the core never computes discount
    /// pricing itself.
    pub discount_percentage: u32,
    pub created_at: Timestamp,
}

/// Color UUID
pub type ColorUuid = TypedUuid<ColorRecord>;

/// Color Record
#[derive(Debug, Clone)]
pub struct ColorRecord {
    pub uuid: ColorUuid,
    pub name: String,
    pub hex: String,
}

/// Size UUID
pub type SizeUuid = TypedUuid<SizeRecord>;

/// Size Record
#[derive(Debug, Clone)]
pub struct SizeRecord {
    pub uuid: SizeUuid,
    pub label: String,
}

/// Variant UUID
pub type VariantUuid = TypedUuid<VariantRecord>;

/// Variant Record
///
/// One purchasable product x color x size combination. `price` is the
/// authoritative unit price at the instant it is read; `stock` only ever
/// changes through the inventory ledger.
#[derive(Debug, Clone)]
pub struct VariantRecord {
    pub uuid: VariantUuid,
    pub product_uuid: ProductUuid,
    pub color_uuid: ColorUuid,
    pub size_uuid: SizeUuid,
    pub price: u64,
    pub stock: u64,
}
