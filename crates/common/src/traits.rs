use async_trait::async_trait;

use crate::errors::{ModelError, WarehouseError};
use crate::models::{FeatureRow, PricePoint, Symbol};

/// Read access to per-instrument feature rows.
#[async_trait]
pub trait FeatureStore: Send + Sync {
    /// Most recent rows for `symbol`, newest first. Unknown symbols yield an
    /// empty vector.
    async fn latest_features(&self, symbol: &Symbol) -> Result<Vec<FeatureRow>, WarehouseError>;

    /// Close prices for `symbol`, oldest first.
    async fn price_history(&self, symbol: &Symbol) -> Result<Vec<PricePoint>, WarehouseError>;
}

/// Reference data describing what the warehouse can answer.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn list_instruments(&self) -> Result<Vec<String>, WarehouseError>;

    async fn list_feature_columns(&self) -> Result<Vec<String>, WarehouseError>;
}

/// Single-shot prompt/response access to a generative model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError>;
}
