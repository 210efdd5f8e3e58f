use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use tokio::time;
use tracing::{debug, error, warn};

use common::errors::WarehouseError;
use common::models::{FeatureRow, PricePoint, Symbol};
use common::traits::{Catalog, FeatureStore};

use crate::db::{self, SetupError};
use crate::repositories::{CatalogRepository, FeaturesRepository};

/// Maximum number of feature rows handed to the model per request.
pub const FEATURE_WINDOW: i64 = 30;

/// Maximum number of points returned for the price chart.
pub const CHART_WINDOW: i64 = 500;

/// Owned handle on the feature warehouse. Cloning shares the pool.
#[derive(Clone)]
pub struct Warehouse {
    pool: SqlitePool,
    table: String,
    query_timeout: Duration,
}

impl Warehouse {
    pub async fn connect(
        url: &str,
        table: &str,
        query_timeout: Duration,
    ) -> Result<Self, SetupError> {
        let pool = db::connect_pool(url, query_timeout).await?;
        Self::from_pool(pool, table, query_timeout)
    }

    pub fn from_pool(
        pool: SqlitePool,
        table: &str,
        query_timeout: Duration,
    ) -> Result<Self, SetupError> {
        db::validate_table_name(table)?;
        Ok(Self {
            pool,
            table: table.to_string(),
            query_timeout,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Newest-first window of feature rows for `symbol`.
    pub async fn fetch_latest_features(
        &self,
        symbol: &Symbol,
    ) -> Result<Vec<FeatureRow>, WarehouseError> {
        let rows = self
            .bounded(
                "latest features",
                FeaturesRepository::latest_for_symbol(
                    &self.pool,
                    &self.table,
                    symbol.as_str(),
                    FEATURE_WINDOW,
                ),
            )
            .await?;

        debug!("Fetched {} feature rows for {}", rows.len(), symbol);
        Ok(rows)
    }

    async fn bounded<T, F>(&self, what: &str, query: F) -> Result<T, WarehouseError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match time::timeout(self.query_timeout, query).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                error!("Warehouse query '{}' failed: {}", what, e);
                Err(WarehouseError::UpstreamUnavailable(e.to_string()))
            }
            Err(_) => {
                warn!(
                    "Warehouse query '{}' exceeded {:?}",
                    what, self.query_timeout
                );
                Err(WarehouseError::QueryTimeout(self.query_timeout))
            }
        }
    }
}

#[async_trait]
impl FeatureStore for Warehouse {
    async fn latest_features(&self, symbol: &Symbol) -> Result<Vec<FeatureRow>, WarehouseError> {
        self.fetch_latest_features(symbol).await
    }

    async fn price_history(&self, symbol: &Symbol) -> Result<Vec<PricePoint>, WarehouseError> {
        self.bounded(
            "price history",
            FeaturesRepository::close_history(&self.pool, &self.table, symbol.as_str(), CHART_WINDOW),
        )
        .await
    }
}

#[async_trait]
impl Catalog for Warehouse {
    async fn list_instruments(&self) -> Result<Vec<String>, WarehouseError> {
        self.bounded(
            "distinct symbols",
            CatalogRepository::distinct_symbols(&self.pool, &self.table),
        )
        .await
    }

    async fn list_feature_columns(&self) -> Result<Vec<String>, WarehouseError> {
        let columns = self
            .bounded(
                "table schema",
                CatalogRepository::column_names(&self.pool, &self.table),
            )
            .await?;

        if columns.is_empty() {
            return Err(WarehouseError::UpstreamUnavailable(format!(
                "feature table '{}' not found",
                self.table
            )));
        }
        Ok(columns)
    }
}
