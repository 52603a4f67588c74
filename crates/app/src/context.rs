//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        carts::{CartsService, PgCartsService},
        catalog::{CatalogService, PgCatalogService},
        inventory::{InventoryLedger, PgInventoryLedger},
        orders::{OrdersService, PgOrdersService},
        wishlists::{PgWishlistsService, WishlistsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// The composed service graph. Exactly one storage adapter exists, chosen
/// here; components only ever see the trait objects.
#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn CatalogService>,
    pub inventory: Arc<dyn InventoryLedger>,
    pub carts: Arc<dyn CartsService>,
    pub wishlists: Arc<dyn WishlistsService>,
    pub orders: Arc<dyn OrdersService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(url: &str) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        Ok(Self {
            catalog: Arc::new(PgCatalogService::new(db.clone())),
            inventory: Arc::new(PgInventoryLedger::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            wishlists: Arc::new(PgWishlistsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db)),
        })
    }
}
