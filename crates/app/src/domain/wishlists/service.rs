//! Wishlists service.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashSet;

use crate::{
    database::Db,
    domain::{
        catalog::records::ProductUuid,
        wishlists::{
            errors::WishlistsServiceError, records::WishlistEntryUuid,
            repository::PgWishlistRepository,
        },
    },
    sessions::GuestSessionUuid,
};

#[derive(Debug, Clone)]
pub struct PgWishlistsService {
    db: Db,
    repository: PgWishlistRepository,
}

impl PgWishlistsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgWishlistRepository::new(),
        }
    }
}

#[async_trait]
impl WishlistsService for PgWishlistsService {
    async fn like(
        &self,
        session: GuestSessionUuid,
        product: ProductUuid,
    ) -> Result<u64, WishlistsServiceError> {
        let mut tx = self.db.begin().await?;

        self.repository
            .create_entry(&mut tx, WishlistEntryUuid::new(), session, product)
            .await?;

        let count = self.repository.count(&mut tx, session).await?;

        tx.commit().await?;

        Ok(count)
    }

    async fn unlike(
        &self,
        session: GuestSessionUuid,
        product: ProductUuid,
    ) -> Result<u64, WishlistsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_entry(&mut tx, session, product).await?;

        if rows_affected == 0 {
            return Err(WishlistsServiceError::NotLiked);
        }

        let count = self.repository.count(&mut tx, session).await?;

        tx.commit().await?;

        Ok(count)
    }

    async fn list(
        &self,
        session: Option<GuestSessionUuid>,
    ) -> Result<FxHashSet<ProductUuid>, WishlistsServiceError> {
        let Some(session) = session else {
            return Ok(FxHashSet::default());
        };

        let mut tx = self.db.begin().await?;

        let products = self.repository.list_products(&mut tx, session).await?;

        tx.commit().await?;

        Ok(products.into_iter().collect())
    }

    async fn count(&self, session: Option<GuestSessionUuid>) -> Result<u64, WishlistsServiceError> {
        let Some(session) = session else {
            return Ok(0);
        };

        let mut tx = self.db.begin().await?;

        let count = self.repository.count(&mut tx, session).await?;

        tx.commit().await?;

        Ok(count)
    }

    async fn contains(
        &self,
        session: Option<GuestSessionUuid>,
        product: ProductUuid,
    ) -> Result<bool, WishlistsServiceError> {
        let Some(session) = session else {
            return Ok(false);
        };

        let mut tx = self.db.begin().await?;

        let contained = self.repository.contains(&mut tx, session, product).await?;

        tx.commit().await?;

        Ok(contained)
    }
}

#[automock]
#[async_trait]
pub trait WishlistsService: Send + Sync {
    /// Like a product, returning the new wishlist size. Liking an already
    /// liked product fails with `AlreadyLiked`.
    async fn like(
        &self,
        session: GuestSessionUuid,
        product: ProductUuid,
    ) -> Result<u64, WishlistsServiceError>;

    /// Unlike a product, returning the new wishlist size. Unliking a product
    /// that is not on the list fails with `NotLiked`.
    async fn unlike(
        &self,
        session: GuestSessionUuid,
        product: ProductUuid,
    ) -> Result<u64, WishlistsServiceError>;

    /// The set of liked product ids.
    async fn list(
        &self,
        session: Option<GuestSessionUuid>,
    ) -> Result<FxHashSet<ProductUuid>, WishlistsServiceError>;

    /// Wishlist size.
    async fn count(&self, session: Option<GuestSessionUuid>)
    -> Result<u64, WishlistsServiceError>;

    /// Whether a product is on the session's wishlist.
    async fn contains(
        &self,
        session: Option<GuestSessionUuid>,
        product: ProductUuid,
    ) -> Result<bool, WishlistsServiceError>;
}
