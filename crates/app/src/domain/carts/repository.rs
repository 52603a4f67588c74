//! Cart Lines Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    database::{quantity_param, try_get_amount, try_get_quantity},
    domain::{
        carts::records::{CartLineDetails, CartLineRecord, CartLineUuid, PricedCartLine},
        catalog::records::{ProductUuid, VariantUuid},
    },
    sessions::GuestSessionUuid,
};

const UPSERT_LINE_SQL: &str = include_str!("sql/upsert_line.sql");
const GET_LINE_SQL: &str = include_str!("sql/get_line.sql");
const SET_LINE_QUANTITY_SQL: &str = include_str!("sql/set_line_quantity.sql");
const DELETE_LINE_SQL: &str = include_str!("sql/delete_line.sql");
const LIST_DETAILS_SQL: &str = include_str!("sql/list_details.sql");
const COUNT_LINES_SQL: &str = include_str!("sql/count_lines.sql");
const SUBTOTAL_SQL: &str = include_str!("sql/subtotal.sql");
const CLEAR_LINES_SQL: &str = include_str!("sql/clear_lines.sql");
const PRICED_LINES_SQL: &str = include_str!("sql/priced_lines.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartLinesRepository;

impl PgCartLinesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert a line or merge the quantity into the existing row for the
    /// same `(session, variant)` pair, returning the merged row. The merge
    /// is a single statement, so concurrent adds serialize on the row lock
    /// instead of losing updates.
    pub(crate) async fn upsert_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        line: CartLineUuid,
        session: GuestSessionUuid,
        variant: VariantUuid,
        quantity: u32,
    ) -> Result<CartLineRecord, sqlx::Error> {
        query_as::<Postgres, CartLineRecord>(UPSERT_LINE_SQL)
            .bind(line.into_uuid())
            .bind(session.into_uuid())
            .bind(variant.into_uuid())
            .bind(quantity_param(quantity)?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        line: CartLineUuid,
        session: GuestSessionUuid,
    ) -> Result<Option<CartLineRecord>, sqlx::Error> {
        query_as::<Postgres, CartLineRecord>(GET_LINE_SQL)
            .bind(line.into_uuid())
            .bind(session.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn set_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        line: CartLineUuid,
        session: GuestSessionUuid,
        quantity: u32,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_LINE_QUANTITY_SQL)
            .bind(line.into_uuid())
            .bind(session.into_uuid())
            .bind(quantity_param(quantity)?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        line: CartLineUuid,
        session: GuestSessionUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_LINE_SQL)
            .bind(line.into_uuid())
            .bind(session.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn list_details(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        session: GuestSessionUuid,
    ) -> Result<Vec<CartLineDetails>, sqlx::Error> {
        query_as::<Postgres, CartLineDetails>(LIST_DETAILS_SQL)
            .bind(session.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        session: GuestSessionUuid,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_LINES_SQL)
            .bind(session.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
            index: "count".to_string(),
            source: Box::new(e),
        })
    }

    pub(crate) async fn subtotal(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        session: GuestSessionUuid,
    ) -> Result<u64, sqlx::Error> {
        let subtotal: i64 = query_scalar(SUBTOTAL_SQL)
            .bind(session.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(subtotal).map_err(|e| sqlx::Error::ColumnDecode {
            index: "subtotal".to_string(),
            source: Box::new(e),
        })
    }

    pub(crate) async fn clear(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        session: GuestSessionUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_LINES_SQL)
            .bind(session.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Lines joined with live variant price and stock, in add order, for the
    /// checkout pipeline.
    pub(crate) async fn priced_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        session: GuestSessionUuid,
    ) -> Result<Vec<PricedCartLine>, sqlx::Error> {
        query_as::<Postgres, PricedCartLine>(PRICED_LINES_SQL)
            .bind(session.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for CartLineRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartLineUuid::from_uuid(row.try_get("uuid")?),
            session_uuid: GuestSessionUuid::from_uuid(row.try_get("session_uuid")?),
            variant_uuid: VariantUuid::from_uuid(row.try_get("variant_uuid")?),
            quantity: try_get_quantity(row, "quantity")?,
            added_at: row.try_get::<SqlxTimestamp, _>("added_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CartLineDetails {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartLineUuid::from_uuid(row.try_get("uuid")?),
            variant_uuid: VariantUuid::from_uuid(row.try_get("variant_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            product_name: row.try_get("product_name")?,
            color_name: row.try_get("color_name")?,
            color_hex: row.try_get("color_hex")?,
            size_label: row.try_get("size_label")?,
            unit_price: try_get_amount(row, "price")?,
            quantity: try_get_quantity(row, "quantity")?,
            stock: try_get_amount(row, "stock")?,
            added_at: row.try_get::<SqlxTimestamp, _>("added_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for PricedCartLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            variant_uuid: VariantUuid::from_uuid(row.try_get("variant_uuid")?),
            quantity: try_get_quantity(row, "quantity")?,
            unit_price: try_get_amount(row, "price")?,
            stock: try_get_amount(row, "stock")?,
        })
    }
}
