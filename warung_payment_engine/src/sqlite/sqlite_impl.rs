//! `SqliteDatabase` is a concrete implementation of a reconciliation record store.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements the [`ReconciliationDatabase`] trait.
use std::fmt::Debug;

use sqlx::SqlitePool;

use super::db::{new_pool, orders, run_migrations};
use crate::{
    db_types::{NewOrder, Order, OrderStatus, ProviderReference},
    traits::{ReconciliationDatabase, ReconciliationError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database connection pool for the given URL.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, ReconciliationError> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date using the migrations embedded in this crate.
    pub async fn migrate(&self) -> Result<(), ReconciliationError> {
        run_migrations(&self.pool).await?;
        Ok(())
    }
}

impl ReconciliationDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn fetch_order_by_reference(
        &self,
        reference: &ProviderReference,
    ) -> Result<Option<Order>, ReconciliationError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_reference(reference, &mut conn).await?;
        Ok(order)
    }

    async fn insert_order(&self, order: NewOrder) -> Result<(Order, bool), ReconciliationError> {
        let mut conn = self.pool.acquire().await?;
        orders::idempotent_insert(order, &mut conn).await
    }

    async fn checked_status_update(
        &self,
        reference: &ProviderReference,
        expected: OrderStatus,
        target: OrderStatus,
        metadata: &str,
    ) -> Result<Option<Order>, ReconciliationError> {
        let mut conn = self.pool.acquire().await?;
        orders::checked_status_update(reference, expected, target, metadata, &mut conn).await
    }

    async fn close(&mut self) -> Result<(), ReconciliationError> {
        self.pool.close().await;
        Ok(())
    }
}
