//! Catalog service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::catalog::{
        errors::CatalogServiceError,
        data::{NewColor, NewProduct, NewSize, NewVariant},
        records::{ColorRecord, ProductRecord, ProductUuid, SizeRecord, VariantRecord, VariantUuid},
        repository::PgCatalogRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn create_color(&self, color: NewColor) -> Result<ColorRecord, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_color(&mut tx, color).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn create_size(&self, size: NewSize) -> Result<SizeRecord, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_size(&mut tx, size).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn create_variant(
        &self,
        variant: NewVariant,
    ) -> Result<VariantRecord, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_variant(&mut tx, variant).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn get_variant(&self, variant: VariantUuid) -> Result<VariantRecord, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let variant = self.repository.get_variant(&mut tx, variant).await?;

        tx.commit().await?;

        Ok(variant)
    }

    async fn update_variant_price(
        &self,
        variant: VariantUuid,
        price: u64,
    ) -> Result<VariantRecord, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_variant_price(&mut tx, variant, price)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Creates a new product.
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, CatalogServiceError>;

    /// Creates a new color.
    async fn create_color(&self, color: NewColor) -> Result<ColorRecord, CatalogServiceError>;

    /// Creates a new size.
    async fn create_size(&self, size: NewSize) -> Result<SizeRecord, CatalogServiceError>;

    /// Creates a new variant with its initial stock level.
    async fn create_variant(
        &self,
        variant: NewVariant,
    ) -> Result<VariantRecord, CatalogServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductUuid)
    -> Result<ProductRecord, CatalogServiceError>;

    /// Retrieve a single variant with its current price and stock.
    async fn get_variant(&self, variant: VariantUuid)
    -> Result<VariantRecord, CatalogServiceError>;

    /// Update a variant's unit price. Orders already placed keep the price
    /// captured at purchase time.
    async fn update_variant_price(
        &self,
        variant: VariantUuid,
        price: u64,
    ) -> Result<VariantRecord, CatalogServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn create_and_get_variant_round_trip() -> TestResult {
        let ctx = TestContext::new().await;

        let variant = ctx.seed_variant(8_400, 5).await;

        let fetched = ctx.catalog.get_variant(variant).await?;

        assert_eq!(fetched.uuid, variant);
        assert_eq!(fetched.price, 8_400);
        assert_eq!(fetched.stock, 5);

        Ok(())
    }

    #[tokio::test]
    async fn get_variant_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.catalog.get_variant(VariantUuid::new()).await;

        assert!(
            matches!(result, Err(CatalogServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn create_variant_with_unknown_product_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        let color = ctx
            .catalog
            .create_color(NewColor {
                uuid: crate::domain::catalog::records::ColorUuid::new(),
                name: "Black".to_string(),
                hex: "#000000".to_string(),
            })
            .await?;

        let size = ctx
            .catalog
            .create_size(NewSize {
                uuid: crate::domain::catalog::records::SizeUuid::new(),
                label: "M".to_string(),
            })
            .await?;

        let result = ctx
            .catalog
            .create_variant(NewVariant {
                uuid: VariantUuid::new(),
                product_uuid: ProductUuid::new(),
                color_uuid: color.uuid,
                size_uuid: size.uuid,
                price: 1_000,
                stock: 1,
            })
            .await;

        assert!(
            matches!(result, Err(CatalogServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_variant_combination_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        let variant = ctx.seed_variant(1_000, 1).await;
        let existing = ctx.catalog.get_variant(variant).await?;

        let result = ctx
            .catalog
            .create_variant(NewVariant {
                uuid: VariantUuid::new(),
                product_uuid: existing.product_uuid,
                color_uuid: existing.color_uuid,
                size_uuid: existing.size_uuid,
                price: 2_000,
                stock: 3,
            })
            .await;

        assert!(
            matches!(result, Err(CatalogServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_variant_price_reflects_new_price() -> TestResult {
        let ctx = TestContext::new().await;

        let variant = ctx.seed_variant(1_000, 2).await;

        let updated = ctx.catalog.update_variant_price(variant, 1_250).await?;

        assert_eq!(updated.price, 1_250);
        assert_eq!(updated.stock, 2, "price update must not touch stock");

        Ok(())
    }
}
