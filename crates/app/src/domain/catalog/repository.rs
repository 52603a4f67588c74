//! Catalog Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::{amount_param, quantity_param, try_get_amount, try_get_quantity},
    domain::catalog::{
        data::{NewColor, NewProduct, NewSize, NewVariant},
        records::{
            ColorRecord, ColorUuid, ProductRecord, ProductUuid, SizeRecord, SizeUuid,
            VariantRecord, VariantUuid,
        },
    },
};

const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const CREATE_COLOR_SQL: &str = include_str!("sql/create_color.sql");
const CREATE_SIZE_SQL: &str = include_str!("sql/create_size.sql");
const CREATE_VARIANT_SQL: &str = include_str!("sql/create_variant.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const GET_VARIANT_SQL: &str = include_str!("sql/get_variant.sql");
const UPDATE_VARIANT_PRICE_SQL: &str = include_str!("sql/update_variant_price.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: NewProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(product.name)
            .bind(amount_param(product.base_price)?)
            .bind(quantity_param(product.discount_percentage)?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_color(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        color: NewColor,
    ) -> Result<ColorRecord, sqlx::Error> {
        query_as::<Postgres, ColorRecord>(CREATE_COLOR_SQL)
            .bind(color.uuid.into_uuid())
            .bind(color.name)
            .bind(color.hex)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_size(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        size: NewSize,
    ) -> Result<SizeRecord, sqlx::Error> {
        query_as::<Postgres, SizeRecord>(CREATE_SIZE_SQL)
            .bind(size.uuid.into_uuid())
            .bind(size.label)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: NewVariant,
    ) -> Result<VariantRecord, sqlx::Error> {
        query_as::<Postgres, VariantRecord>(CREATE_VARIANT_SQL)
            .bind(variant.uuid.into_uuid())
            .bind(variant.product_uuid.into_uuid())
            .bind(variant.color_uuid.into_uuid())
            .bind(variant.size_uuid.into_uuid())
            .bind(amount_param(variant.price)?)
            .bind(amount_param(variant.stock)?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
    ) -> Result<VariantRecord, sqlx::Error> {
        query_as::<Postgres, VariantRecord>(GET_VARIANT_SQL)
            .bind(variant.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_variant_price(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
        price: u64,
    ) -> Result<VariantRecord, sqlx::Error> {
        query_as::<Postgres, VariantRecord>(UPDATE_VARIANT_PRICE_SQL)
            .bind(variant.into_uuid())
            .bind(amount_param(price)?)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            base_price: try_get_amount(row, "base_price")?,
            discount_percentage: try_get_quantity(row, "discount_percentage")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ColorRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ColorUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            hex: row.try_get("hex")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for SizeRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: SizeUuid::from_uuid(row.try_get("uuid")?),
            label: row.try_get("label")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for VariantRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: VariantUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            color_uuid: ColorUuid::from_uuid(row.try_get("color_uuid")?),
            size_uuid: SizeUuid::from_uuid(row.try_get("size_uuid")?),
            price: try_get_amount(row, "price")?,
            stock: try_get_amount(row, "stock")?,
        })
    }
}
