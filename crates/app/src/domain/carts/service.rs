//! Carts service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        carts::{
            errors::CartsServiceError,
            records::{CartLineDetails, CartLineRecord, CartLineUuid},
            repository::PgCartLinesRepository,
        },
        catalog::records::VariantUuid,
        inventory::PgInventoryRepository,
    },
    sessions::GuestSessionUuid,
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    lines: PgCartLinesRepository,
    inventory: PgInventoryRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            lines: PgCartLinesRepository::new(),
            inventory: PgInventoryRepository::new(),
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn add(
        &self,
        session: GuestSessionUuid,
        variant: VariantUuid,
        quantity: u32,
    ) -> Result<CartLineRecord, CartsServiceError> {
        if quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin().await?;

        // Merge first, validate after: the upsert takes the row lock, so the
        // merged quantity seen here already includes any concurrent add. If
        // validation fails the transaction is dropped and nothing persists.
        let line = self
            .lines
            .upsert_line(&mut tx, CartLineUuid::new(), session, variant, quantity)
            .await?;

        let stock = self
            .inventory
            .stock_level(&mut tx, variant)
            .await?
            .ok_or(CartsServiceError::VariantNotFound)?;

        if u64::from(line.quantity) > stock {
            return Err(CartsServiceError::InsufficientStock { variant });
        }

        tx.commit().await?;

        Ok(line)
    }

    async fn set_quantity(
        &self,
        session: GuestSessionUuid,
        line: CartLineUuid,
        quantity: u32,
    ) -> Result<(), CartsServiceError> {
        if quantity == 0 {
            return self.remove(session, line).await;
        }

        let mut tx = self.db.begin().await?;

        let record = self
            .lines
            .line(&mut tx, line, session)
            .await?
            .ok_or(CartsServiceError::LineNotFound)?;

        // Stock may have shrunk since the line was created.
        let stock = self
            .inventory
            .stock_level(&mut tx, record.variant_uuid)
            .await?
            .ok_or(CartsServiceError::VariantNotFound)?;

        if u64::from(quantity) > stock {
            return Err(CartsServiceError::InsufficientStock {
                variant: record.variant_uuid,
            });
        }

        self.lines
            .set_quantity(&mut tx, line, session, quantity)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn remove(
        &self,
        session: GuestSessionUuid,
        line: CartLineUuid,
    ) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.lines.delete_line(&mut tx, line, session).await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::LineNotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn list(
        &self,
        session: Option<GuestSessionUuid>,
    ) -> Result<Vec<CartLineDetails>, CartsServiceError> {
        let Some(session) = session else {
            return Ok(Vec::new());
        };

        let mut tx = self.db.begin().await?;

        let details = self.lines.list_details(&mut tx, session).await?;

        tx.commit().await?;

        Ok(details)
    }

    async fn count(&self, session: Option<GuestSessionUuid>) -> Result<u64, CartsServiceError> {
        let Some(session) = session else {
            return Ok(0);
        };

        let mut tx = self.db.begin().await?;

        let count = self.lines.count(&mut tx, session).await?;

        tx.commit().await?;

        Ok(count)
    }

    async fn subtotal(&self, session: Option<GuestSessionUuid>) -> Result<u64, CartsServiceError> {
        let Some(session) = session else {
            return Ok(0);
        };

        let mut tx = self.db.begin().await?;

        let subtotal = self.lines.subtotal(&mut tx, session).await?;

        tx.commit().await?;

        Ok(subtotal)
    }

    async fn clear(&self, session: GuestSessionUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.lines.clear(&mut tx, session).await?;

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Add `quantity` units of a variant to the session's cart, merging into
    /// an existing line for the same variant. Fails without changing the
    /// cart when the merged quantity exceeds current stock.
    async fn add(
        &self,
        session: GuestSessionUuid,
        variant: VariantUuid,
        quantity: u32,
    ) -> Result<CartLineRecord, CartsServiceError>;

    /// Replace a line's quantity, re-validating against current stock.
    /// A quantity of zero removes the line.
    async fn set_quantity(
        &self,
        session: GuestSessionUuid,
        line: CartLineUuid,
        quantity: u32,
    ) -> Result<(), CartsServiceError>;

    /// Remove a line. Removing an absent line reports `LineNotFound` so UIs
    /// can react, though the end state is the same.
    async fn remove(
        &self,
        session: GuestSessionUuid,
        line: CartLineUuid,
    ) -> Result<(), CartsServiceError>;

    /// The session's cart joined with catalog display data. A missing
    /// session yields an empty cart; render paths never fail here.
    async fn list(
        &self,
        session: Option<GuestSessionUuid>,
    ) -> Result<Vec<CartLineDetails>, CartsServiceError>;

    /// Total number of units across the cart.
    async fn count(&self, session: Option<GuestSessionUuid>) -> Result<u64, CartsServiceError>;

    /// Cart subtotal at current catalog prices.
    async fn subtotal(&self, session: Option<GuestSessionUuid>) -> Result<u64, CartsServiceError>;

    /// Delete every line in the session's cart.
    async fn clear(&self, session: GuestSessionUuid) -> Result<(), CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{domain::inventory::InventoryLedger, test::TestContext};

    use super::*;

    #[tokio::test]
    async fn add_creates_line_with_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let session = TestContext::new_session();

        let variant = ctx.seed_variant(1_000, 5).await;

        let line = ctx.carts.add(session, variant, 2).await?;

        assert_eq!(line.session_uuid, session);
        assert_eq!(line.variant_uuid, variant);
        assert_eq!(line.quantity, 2);

        Ok(())
    }

    #[tokio::test]
    async fn adding_same_variant_twice_merges_into_one_line() -> TestResult {
        let ctx = TestContext::new().await;
        let session = TestContext::new_session();

        let variant = ctx.seed_variant(1_000, 5).await;

        ctx.carts.add(session, variant, 1).await?;
        let merged = ctx.carts.add(session, variant, 1).await?;

        assert_eq!(merged.quantity, 2);

        let lines = ctx.carts.list(Some(session)).await?;

        assert_eq!(lines.len(), 1, "duplicate adds must not create new rows");
        assert_eq!(lines[0].quantity, 2);

        Ok(())
    }

    #[tokio::test]
    async fn add_beyond_stock_fails_and_leaves_cart_unchanged() -> TestResult {
        let ctx = TestContext::new().await;
        let session = TestContext::new_session();

        let variant = ctx.seed_variant(1_000, 2).await;

        ctx.carts.add(session, variant, 1).await?;

        let result = ctx.carts.add(session, variant, 2).await;

        assert!(
            matches!(result, Err(CartsServiceError::InsufficientStock { .. })),
            "expected InsufficientStock, got {result:?}"
        );

        let lines = ctx.carts.list(Some(session)).await?;

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 1, "failed add must not change the cart");

        Ok(())
    }

    #[tokio::test]
    async fn add_unknown_variant_returns_variant_not_found() {
        let ctx = TestContext::new().await;
        let session = TestContext::new_session();

        let result = ctx.carts.add(session, VariantUuid::new(), 1).await;

        assert!(
            matches!(result, Err(CartsServiceError::VariantNotFound)),
            "expected VariantNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn add_zero_quantity_is_rejected() {
        let ctx = TestContext::new().await;
        let session = TestContext::new_session();

        let result = ctx.carts.add(session, VariantUuid::new(), 0).await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );
    }

    #[tokio::test]
    async fn concurrent_adds_merge_without_losing_updates() -> TestResult {
        let ctx = TestContext::new().await;
        let session = TestContext::new_session();

        let variant = ctx.seed_variant(1_000, 5).await;

        let carts_a = ctx.carts.clone();
        let carts_b = ctx.carts.clone();

        let (first, second) = tokio::join!(
            carts_a.add(session, variant, 1),
            carts_b.add(session, variant, 1)
        );

        first?;
        second?;

        let lines = ctx.carts.list(Some(session)).await?;

        assert_eq!(lines.len(), 1, "concurrent adds must merge into one line");
        assert_eq!(lines[0].quantity, 2);

        Ok(())
    }

    #[tokio::test]
    async fn set_quantity_revalidates_against_current_stock() -> TestResult {
        let ctx = TestContext::new().await;
        let session = TestContext::new_session();

        let variant = ctx.seed_variant(1_000, 5).await;

        let line = ctx.carts.add(session, variant, 2).await?;

        // Stock shrinks after the line was created.
        ctx.inventory.decrement(variant, 4).await?;

        let result = ctx.carts.set_quantity(session, line.uuid, 2).await;

        assert!(
            matches!(result, Err(CartsServiceError::InsufficientStock { .. })),
            "expected InsufficientStock, got {result:?}"
        );

        ctx.carts.set_quantity(session, line.uuid, 1).await?;

        let lines = ctx.carts.list(Some(session)).await?;

        assert_eq!(lines[0].quantity, 1);

        Ok(())
    }

    #[tokio::test]
    async fn set_quantity_zero_removes_the_line() -> TestResult {
        let ctx = TestContext::new().await;
        let session = TestContext::new_session();

        let variant = ctx.seed_variant(1_000, 5).await;

        let line = ctx.carts.add(session, variant, 2).await?;

        ctx.carts.set_quantity(session, line.uuid, 0).await?;

        assert!(ctx.carts.list(Some(session)).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn remove_unknown_line_returns_line_not_found() {
        let ctx = TestContext::new().await;
        let session = TestContext::new_session();

        let result = ctx.carts.remove(session, CartLineUuid::new()).await;

        assert!(
            matches!(result, Err(CartsServiceError::LineNotFound)),
            "expected LineNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn lines_are_scoped_to_their_session() -> TestResult {
        let ctx = TestContext::new().await;
        let session_a = TestContext::new_session();
        let session_b = TestContext::new_session();

        let variant = ctx.seed_variant(1_000, 5).await;

        let line = ctx.carts.add(session_a, variant, 1).await?;

        assert!(ctx.carts.list(Some(session_b)).await?.is_empty());

        let result = ctx.carts.remove(session_b, line.uuid).await;

        assert!(
            matches!(result, Err(CartsServiceError::LineNotFound)),
            "expected LineNotFound for foreign session, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn list_without_session_is_empty() -> TestResult {
        let ctx = TestContext::new().await;

        assert!(ctx.carts.list(None).await?.is_empty());
        assert_eq!(ctx.carts.count(None).await?, 0);
        assert_eq!(ctx.carts.subtotal(None).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn count_and_subtotal_follow_cart_contents() -> TestResult {
        let ctx = TestContext::new().await;
        let session = TestContext::new_session();

        let variant_a = ctx.seed_variant(8_400, 5).await;
        let variant_b = ctx.seed_variant(7_600, 5).await;

        ctx.carts.add(session, variant_a, 1).await?;
        ctx.carts.add(session, variant_b, 2).await?;

        assert_eq!(ctx.carts.count(Some(session)).await?, 3);
        assert_eq!(ctx.carts.subtotal(Some(session)).await?, 23_600);

        Ok(())
    }

    #[tokio::test]
    async fn clear_empties_the_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let session = TestContext::new_session();

        let variant = ctx.seed_variant(1_000, 5).await;

        ctx.carts.add(session, variant, 2).await?;
        ctx.carts.clear(session).await?;

        assert!(ctx.carts.list(Some(session)).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn list_carries_catalog_details() -> TestResult {
        let ctx = TestContext::new().await;
        let session = TestContext::new_session();

        let variant = ctx.seed_variant(2_500, 4).await;

        ctx.carts.add(session, variant, 2).await?;

        let lines = ctx.carts.list(Some(session)).await?;
        let line = &lines[0];

        assert_eq!(line.unit_price, 2_500);
        assert_eq!(line.stock, 4);
        assert_eq!(line.line_total(), 5_000);
        assert!(!line.product_name.is_empty());
        assert!(!line.size_label.is_empty());

        Ok(())
    }
}
