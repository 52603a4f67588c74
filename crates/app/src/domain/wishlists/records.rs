//! Wishlist Records

use jiff::Timestamp;

use crate::{
    domain::catalog::records::ProductUuid, sessions::GuestSessionUuid, uuids::TypedUuid,
};

/// Wishlist Entry UUID
pub type WishlistEntryUuid = TypedUuid<WishlistEntryRecord>;

/// Wishlist Entry Record
#[derive(Debug, Clone)]
pub struct WishlistEntryRecord {
    pub uuid: WishlistEntryUuid,
    pub session_uuid: GuestSessionUuid,
    pub product_uuid: ProductUuid,
    pub liked_at: Timestamp,
}
