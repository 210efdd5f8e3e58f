use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use common::errors::AdviceError;
use common::models::FeatureRow;
use common::traits::LanguageModel;

/// Expected reply shape, spelled out for the model.
pub const RESPONSE_FORMAT: &str =
    r#"{"signal": "LONG" or "SHORT", "rationale": "<one or two sentences>"}"#;

/// Builds the prompt for one advice request: the feature rows as compact JSON
/// (newest first) followed by the user's question.
pub fn build_prompt(features: &[FeatureRow], user_query: &str) -> Result<String, serde_json::Error> {
    let rows = serde_json::to_string(features)?;

    Ok(format!(
        "Below are the {count} most recent feature rows for one trading instrument, \
newest first, as a JSON array:\n\
{rows}\n\n\
User question: {query}\n\n\
Base your answer only on the data above. Reply with a single JSON object and nothing else, \
exactly in this form:\n\
{format}",
        count = features.len(),
        rows = rows,
        query = user_query.trim(),
        format = RESPONSE_FORMAT,
    ))
}

/// Sends feature rows plus a user question to the model and returns its raw
/// reply. The reply is not interpreted here.
#[derive(Clone)]
pub struct AdviceGenerator {
    model: Arc<dyn LanguageModel>,
}

impl AdviceGenerator {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub async fn generate_advice(
        &self,
        features: &[FeatureRow],
        user_query: &str,
    ) -> Result<String, AdviceError> {
        if features.is_empty() {
            return Err(AdviceError::InvalidRequest(
                "no feature rows to base advice on".to_string(),
            ));
        }

        let prompt = build_prompt(features, user_query).map_err(|e| {
            AdviceError::InvalidRequest(format!("feature rows cannot be serialized: {}", e))
        })?;
        debug!("Prompt is {} chars for {} rows", prompt.len(), features.len());

        let started = Instant::now();
        let raw = self.model.complete(&prompt).await?;
        info!("Model replied in {:?}", started.elapsed());

        Ok(raw)
    }
}
