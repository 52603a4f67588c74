//! Catalog Data

use crate::domain::catalog::records::{ColorUuid, ProductUuid, SizeUuid, VariantUuid};

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub base_price: u64,
    pub discount_percentage: u32,
}

/// New Color Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewColor {
    pub uuid: ColorUuid,
    pub name: String,
    pub hex: String,
}

/// New Size Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewSize {
    pub uuid: SizeUuid,
    pub label: String,
}

/// New Variant Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewVariant {
    pub uuid: VariantUuid,
    pub product_uuid: ProductUuid,
    pub color_uuid: ColorUuid,
    pub size_uuid: SizeUuid,
    pub price: u64,
    pub stock: u64,
}
