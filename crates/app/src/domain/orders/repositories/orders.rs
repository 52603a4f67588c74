//! Orders Repository

use std::str::FromStr;

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    database::{amount_param, try_get_amount},
    domain::orders::{
        data::{OrderContact, ShippingOption},
        records::{OrderRecord, OrderStatus, OrderSummary, OrderUuid},
    },
    sessions::GuestSessionUuid,
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const GET_ORDER_BY_REF_SQL: &str = include_str!("../sql/get_order_by_ref.sql");
const GET_ORDER_STATUS_SQL: &str = include_str!("../sql/get_order_status.sql");
const SET_ORDER_STATUS_SQL: &str = include_str!("../sql/set_order_status.sql");
const LIST_ORDERS_SQL: &str = include_str!("../sql/list_orders.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert the order row. Returns `None` when the ref code collided with
    /// an existing order (`ON CONFLICT DO NOTHING`), leaving the transaction
    /// healthy so the caller can retry with a fresh code.
    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        ref_code: &str,
        session: GuestSessionUuid,
        contact: &OrderContact,
        shipping: &ShippingOption,
    ) -> Result<Option<Timestamp>, sqlx::Error> {
        let created_at: Option<SqlxTimestamp> = query_scalar(CREATE_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(ref_code)
            .bind(session.into_uuid())
            .bind(contact.name.clone())
            .bind(contact.phone.clone())
            .bind(contact.city.clone())
            .bind(contact.address.clone())
            .bind(shipping.label.clone())
            .bind(amount_param(shipping.cost)?)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(created_at.map(SqlxTimestamp::to_jiff))
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn get_order_by_ref(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ref_code: &str,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_BY_REF_SQL)
            .bind(ref_code)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn get_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Option<OrderStatus>, sqlx::Error> {
        let status: Option<String> = query_scalar(GET_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        status.map(|value| decode_status(&value)).transpose()
    }

    pub(crate) async fn set_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        session: GuestSessionUuid,
    ) -> Result<Vec<OrderSummary>, sqlx::Error> {
        query_as::<Postgres, OrderSummary>(LIST_ORDERS_SQL)
            .bind(session.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

fn decode_status(value: &str) -> Result<OrderStatus, sqlx::Error> {
    OrderStatus::from_str(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: "status".to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            ref_code: row.try_get("ref_code")?,
            session_uuid: GuestSessionUuid::from_uuid(row.try_get("session_uuid")?),
            name: row.try_get("name")?,
            phone: row.try_get("phone")?,
            city: row.try_get("city")?,
            address: row.try_get("address")?,
            shipping_label: row.try_get("shipping_label")?,
            shipping_cost: try_get_amount(row, "shipping_cost")?,
            status: decode_status(&status)?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            items: Vec::new(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderSummary {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;
        let shipping_cost = try_get_amount(row, "shipping_cost")?;
        let items_total = try_get_amount(row, "items_total")?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            ref_code: row.try_get("ref_code")?,
            status: decode_status(&status)?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            total: items_total + shipping_cost,
            items_count: try_get_amount(row, "items_count")?,
        })
    }
}
