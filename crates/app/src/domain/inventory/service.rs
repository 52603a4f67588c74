//! Inventory ledger service.

use async_trait::async_trait;
use mockall::automock;
use tracing::debug;

use crate::{
    database::Db,
    domain::{
        catalog::records::VariantUuid,
        inventory::{errors::InventoryError, repository::PgInventoryRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgInventoryLedger {
    db: Db,
    repository: PgInventoryRepository,
}

impl PgInventoryLedger {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgInventoryRepository::new(),
        }
    }
}

#[async_trait]
impl InventoryLedger for PgInventoryLedger {
    async fn check_available(
        &self,
        variant: VariantUuid,
        quantity: u32,
    ) -> Result<bool, InventoryError> {
        let mut tx = self.db.begin().await?;

        let stock = self
            .repository
            .stock_level(&mut tx, variant)
            .await?
            .ok_or(InventoryError::VariantNotFound)?;

        tx.commit().await?;

        Ok(u64::from(quantity) <= stock)
    }

    async fn decrement(&self, variant: VariantUuid, quantity: u32) -> Result<(), InventoryError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.decrement(&mut tx, variant, quantity).await?;

        if rows_affected == 0 {
            // Zero rows means either an unknown variant or not enough stock;
            // a follow-up read in the same transaction tells them apart.
            return match self.repository.stock_level(&mut tx, variant).await? {
                None => Err(InventoryError::VariantNotFound),
                Some(_) => Err(InventoryError::InsufficientStock { variant }),
            };
        }

        tx.commit().await?;

        debug!(variant = %variant, quantity, "decremented stock");

        Ok(())
    }

    async fn restock(&self, variant: VariantUuid, quantity: u64) -> Result<(), InventoryError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.restock(&mut tx, variant, quantity).await?;

        if rows_affected == 0 {
            return Err(InventoryError::VariantNotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait InventoryLedger: Send + Sync {
    /// True iff `quantity` units of the variant are currently in stock.
    async fn check_available(
        &self,
        variant: VariantUuid,
        quantity: u32,
    ) -> Result<bool, InventoryError>;

    /// Atomically reduce stock by `quantity`, failing without any change
    /// when not enough stock remains.
    async fn decrement(&self, variant: VariantUuid, quantity: u32) -> Result<(), InventoryError>;

    /// Increase stock by `quantity` (inbound shipments, cancellations).
    async fn restock(&self, variant: VariantUuid, quantity: u64) -> Result<(), InventoryError>;
}
