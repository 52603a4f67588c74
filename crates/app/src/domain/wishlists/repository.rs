//! Wishlist Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    domain::{
        catalog::records::ProductUuid,
        wishlists::records::{WishlistEntryRecord, WishlistEntryUuid},
    },
    sessions::GuestSessionUuid,
};

const CREATE_ENTRY_SQL: &str = include_str!("sql/create_entry.sql");
const DELETE_ENTRY_SQL: &str = include_str!("sql/delete_entry.sql");
const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const COUNT_ENTRIES_SQL: &str = include_str!("sql/count_entries.sql");
const CONTAINS_PRODUCT_SQL: &str = include_str!("sql/contains_product.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgWishlistRepository;

impl PgWishlistRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_entry(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entry: WishlistEntryUuid,
        session: GuestSessionUuid,
        product: ProductUuid,
    ) -> Result<WishlistEntryRecord, sqlx::Error> {
        query_as::<Postgres, WishlistEntryRecord>(CREATE_ENTRY_SQL)
            .bind(entry.into_uuid())
            .bind(session.into_uuid())
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_entry(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        session: GuestSessionUuid,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ENTRY_SQL)
            .bind(session.into_uuid())
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        session: GuestSessionUuid,
    ) -> Result<Vec<ProductUuid>, sqlx::Error> {
        let rows: Vec<Uuid> = query_scalar(LIST_PRODUCTS_SQL)
            .bind(session.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows.into_iter().map(ProductUuid::from_uuid).collect())
    }

    pub(crate) async fn count(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        session: GuestSessionUuid,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_ENTRIES_SQL)
            .bind(session.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
            index: "count".to_string(),
            source: Box::new(e),
        })
    }

    pub(crate) async fn contains(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        session: GuestSessionUuid,
        product: ProductUuid,
    ) -> Result<bool, sqlx::Error> {
        query_scalar(CONTAINS_PRODUCT_SQL)
            .bind(session.into_uuid())
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for WishlistEntryRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: WishlistEntryUuid::from_uuid(row.try_get("uuid")?),
            session_uuid: GuestSessionUuid::from_uuid(row.try_get("session_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            liked_at: row.try_get::<SqlxTimestamp, _>("liked_at")?.to_jiff(),
        })
    }
}
