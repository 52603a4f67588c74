//! Inventory Repository

use sqlx::{Postgres, Transaction, query, query_scalar};

use crate::{
    database::{amount_param, quantity_param},
    domain::catalog::records::VariantUuid,
};

const GET_STOCK_SQL: &str = include_str!("sql/get_stock.sql");
const DECREMENT_STOCK_SQL: &str = include_str!("sql/decrement_stock.sql");
const RESTOCK_SQL: &str = include_str!("sql/restock.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgInventoryRepository;

impl PgInventoryRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Current stock level, or `None` when the variant does not exist.
    pub(crate) async fn stock_level(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
    ) -> Result<Option<u64>, sqlx::Error> {
        let stock: Option<i64> = query_scalar(GET_STOCK_SQL)
            .bind(variant.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        stock
            .map(|value| {
                u64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
                    index: "stock".to_string(),
                    source: Box::new(e),
                })
            })
            .transpose()
    }

    /// Conditionally reduce stock. Affects zero rows when the variant is
    /// missing or the remaining stock is smaller than `quantity`; the caller
    /// decides what that means for its transaction.
    pub(crate) async fn decrement(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
        quantity: u32,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DECREMENT_STOCK_SQL)
            .bind(variant.into_uuid())
            .bind(i64::from(quantity_param(quantity)?))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn restock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
        quantity: u64,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(RESTOCK_SQL)
            .bind(variant.into_uuid())
            .bind(amount_param(quantity)?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}
