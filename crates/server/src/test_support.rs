use async_trait::async_trait;
use mockall::mock;
use serde_json::{Value, json};

use common::errors::{ModelError, WarehouseError};
use common::models::{FeatureRow, PricePoint, Symbol};
use common::traits::{Catalog, FeatureStore, LanguageModel};

mock! {
    pub Store {}

    #[async_trait]
    impl FeatureStore for Store {
        async fn latest_features(&self, symbol: &Symbol) -> Result<Vec<FeatureRow>, WarehouseError>;
        async fn price_history(&self, symbol: &Symbol) -> Result<Vec<PricePoint>, WarehouseError>;
    }
}

mock! {
    pub Metadata {}

    #[async_trait]
    impl Catalog for Metadata {
        async fn list_instruments(&self) -> Result<Vec<String>, WarehouseError>;
        async fn list_feature_columns(&self) -> Result<Vec<String>, WarehouseError>;
    }
}

mock! {
    pub Model {}

    #[async_trait]
    impl LanguageModel for Model {
        async fn complete(&self, prompt: &str) -> Result<String, ModelError>;
    }
}

pub fn row(value: Value) -> FeatureRow {
    match value {
        Value::Object(map) => FeatureRow::from(map),
        other => panic!("feature row must be an object, got {other}"),
    }
}

/// The two EUR/USD rows used across the end-to-end tests.
pub fn eur_usd_rows() -> Vec<FeatureRow> {
    vec![
        row(json!({"t": 100, "close": 1.08})),
        row(json!({"t": 90, "close": 1.07})),
    ]
}
