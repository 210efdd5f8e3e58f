use std::sync::Arc;

use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use advisor::{AdviceGenerator, parse_signal};
use common::errors::AdviceError;
use common::models::{AdviceOutcome, Symbol};
use common::traits::{FeatureStore, LanguageModel};

/// Runs one advice request: fetch features, ask the model, parse the reply.
/// Stops at the first failing stage.
pub struct AdviceService {
    store: Arc<dyn FeatureStore>,
    generator: AdviceGenerator,
}

impl AdviceService {
    pub fn new(store: Arc<dyn FeatureStore>, model: Arc<dyn LanguageModel>) -> Self {
        Self {
            store,
            generator: AdviceGenerator::new(model),
        }
    }

    pub async fn handle_advice_request(
        &self,
        symbol: &str,
        user_query: &str,
    ) -> Result<AdviceOutcome, AdviceError> {
        let span = info_span!("advice", request_id = %Uuid::new_v4(), symbol = %symbol.trim());

        async {
            let result = self.run(symbol, user_query).await;
            match &result {
                Ok(outcome) => info!("Advice ready: {}", outcome.advice.signal),
                Err(AdviceError::NoDataForInstrument(_)) => info!("No feature data, model not called"),
                Err(e) => warn!(stage = %e.stage(), kind = e.kind(), "Advice failed: {}", e),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run(&self, symbol: &str, user_query: &str) -> Result<AdviceOutcome, AdviceError> {
        let canonical = Symbol::parse(symbol)
            .ok_or_else(|| AdviceError::InvalidRequest("'symbol' is required".to_string()))?;
        if user_query.trim().is_empty() {
            return Err(AdviceError::InvalidRequest("'userQuery' is required".to_string()));
        }

        let features = self.store.latest_features(&canonical).await?;
        if features.is_empty() {
            return Err(AdviceError::NoDataForInstrument(canonical.to_string()));
        }
        debug!("Fetched {} feature rows", features.len());

        let raw = self.generator.generate_advice(&features, user_query).await?;
        let advice = parse_signal(&raw)?;

        Ok(AdviceOutcome {
            symbol: symbol.to_string(),
            advice,
        })
    }
}
