use std::sync::Arc;

use common::traits::{Catalog, FeatureStore, LanguageModel};

use crate::services::AdviceService;

/// Shared handles passed to every route handler.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn Catalog>,
    pub store: Arc<dyn FeatureStore>,
    pub advice: Arc<AdviceService>,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        store: Arc<dyn FeatureStore>,
        model: Arc<dyn LanguageModel>,
    ) -> Self {
        let advice = Arc::new(AdviceService::new(store.clone(), model));
        Self {
            catalog,
            store,
            advice,
        }
    }
}
