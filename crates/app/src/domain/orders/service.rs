//! Orders service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{Span, error, info, warn};

use crate::{
    database::Db,
    domain::{
        carts::PgCartLinesRepository,
        inventory::PgInventoryRepository,
        orders::{
            data::{OrderContact, PlacedOrder, ShippingOption},
            errors::OrdersServiceError,
            records::{OrderItemUuid, OrderRecord, OrderStatus, OrderSummary, OrderUuid},
            ref_code::generate_ref_code,
            repositories::{PgOrderItemsRepository, PgOrdersRepository},
        },
    },
    sessions::GuestSessionUuid,
};

/// How many ref codes to try before declaring the commit failed.
const MAX_REF_CODE_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders: PgOrdersRepository,
    items: PgOrderItemsRepository,
    cart_lines: PgCartLinesRepository,
    inventory: PgInventoryRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            items: PgOrderItemsRepository::new(),
            cart_lines: PgCartLinesRepository::new(),
            inventory: PgInventoryRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.place_order",
        skip(self, contact, shipping),
        fields(
            session_uuid = %session,
            order_uuid = tracing::field::Empty,
            ref_code = tracing::field::Empty,
            line_count = tracing::field::Empty
        ),
        err
    )]
    async fn place_order(
        &self,
        session: GuestSessionUuid,
        contact: OrderContact,
        shipping: ShippingOption,
    ) -> Result<PlacedOrder, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        // Load: the cart joined with live variant price and stock. Prices
        // read here become the per-item purchase snapshot.
        let lines = self.cart_lines.priced_lines(&mut tx, session).await?;

        if lines.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        let span = Span::current();

        span.record("line_count", tracing::field::display(lines.len()));

        // Validate: per-line re-read through the ledger. The conditional
        // decrement below is the final arbiter; this pass exists to reject
        // cheaply before any row is written.
        for line in &lines {
            let stock = self
                .inventory
                .stock_level(&mut tx, line.variant_uuid)
                .await?;

            if stock.is_none_or(|stock| u64::from(line.quantity) > stock) {
                return Err(OrdersServiceError::InsufficientStock {
                    variant: line.variant_uuid,
                });
            }
        }

        let subtotal: u64 = lines.iter().map(|line| line.line_total()).sum();
        let total = subtotal + shipping.cost;

        // Commit: everything below either lands together with the final
        // commit or vanishes when the transaction drops.
        let order_uuid = OrderUuid::new();
        let mut allocated = None;

        for attempt in 1..=MAX_REF_CODE_ATTEMPTS {
            let ref_code = generate_ref_code(Timestamp::now());

            let created_at = self
                .orders
                .create_order(&mut tx, order_uuid, &ref_code, session, &contact, &shipping)
                .await?;

            if created_at.is_some() {
                allocated = Some(ref_code);
                break;
            }

            warn!(attempt, "order ref code collided, regenerating");
        }

        let Some(ref_code) = allocated else {
            error!(
                attempts = MAX_REF_CODE_ATTEMPTS,
                "exhausted order ref code attempts, aborting commit"
            );

            return Err(OrdersServiceError::RefCodeExhausted);
        };

        for line in &lines {
            self.items
                .create_order_item(
                    &mut tx,
                    OrderItemUuid::new(),
                    order_uuid,
                    line.variant_uuid,
                    line.quantity,
                    line.unit_price,
                )
                .await?;

            let rows_affected = self
                .inventory
                .decrement(&mut tx, line.variant_uuid, line.quantity)
                .await?;

            if rows_affected == 0 {
                warn!(
                    variant_uuid = %line.variant_uuid,
                    "stock moved during checkout commit, rolling back"
                );

                return Err(OrdersServiceError::StockConflict {
                    variant: line.variant_uuid,
                });
            }
        }

        self.cart_lines.clear(&mut tx, session).await?;

        tx.commit().await?;

        span.record("order_uuid", tracing::field::display(order_uuid));
        span.record("ref_code", tracing::field::display(&ref_code));

        info!(total, "order placed");

        Ok(PlacedOrder {
            uuid: order_uuid,
            ref_code,
            subtotal,
            total,
        })
    }

    async fn get_order(
        &self,
        order: OrderUuid,
    ) -> Result<Option<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let Some(mut record) = self.orders.get_order(&mut tx, order).await? else {
            return Ok(None);
        };

        let items = self.items.get_order_items(&mut tx, order).await?;

        tx.commit().await?;

        record.items.extend(items);

        Ok(Some(record))
    }

    async fn get_order_by_ref(
        &self,
        ref_code: &str,
    ) -> Result<Option<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let Some(mut record) = self.orders.get_order_by_ref(&mut tx, ref_code).await? else {
            return Ok(None);
        };

        let items = self.items.get_order_items(&mut tx, record.uuid).await?;

        tx.commit().await?;

        record.items.extend(items);

        Ok(Some(record))
    }

    async fn list_orders(
        &self,
        session: GuestSessionUuid,
    ) -> Result<Vec<OrderSummary>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let summaries = self.orders.list_orders(&mut tx, session).await?;

        tx.commit().await?;

        Ok(summaries)
    }

    async fn set_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<(), OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self
            .orders
            .get_status(&mut tx, order)
            .await?
            .ok_or(OrdersServiceError::NotFound)?;

        if !current.can_transition_to(status) {
            return Err(OrdersServiceError::InvalidStatusTransition {
                from: current,
                to: status,
            });
        }

        self.orders.set_status(&mut tx, order, status).await?;

        tx.commit().await?;

        info!(order_uuid = %order, from = %current, to = %status, "order status changed");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Convert the session's cart into an immutable order: validate against
    /// fresh stock, capture per-item prices, decrement inventory, and clear
    /// the cart, all inside one transaction. Any failure leaves no trace.
    async fn place_order(
        &self,
        session: GuestSessionUuid,
        contact: OrderContact,
        shipping: ShippingOption,
    ) -> Result<PlacedOrder, OrdersServiceError>;

    /// Retrieve an order with its items by internal id. Absence is a normal
    /// outcome, not an error.
    async fn get_order(&self, order: OrderUuid)
    -> Result<Option<OrderRecord>, OrdersServiceError>;

    /// Retrieve an order with its items by public ref code.
    async fn get_order_by_ref(
        &self,
        ref_code: &str,
    ) -> Result<Option<OrderRecord>, OrdersServiceError>;

    /// The session's order history, newest first.
    async fn list_orders(
        &self,
        session: GuestSessionUuid,
    ) -> Result<Vec<OrderSummary>, OrdersServiceError>;

    /// Administrative status transition, restricted to the legal graph.
    async fn set_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<(), OrdersServiceError>;
}
