use serde::{Deserialize, Serialize};

use crate::models::TradeSignal;

/// Body of an advice request. Absent fields deserialize as empty strings so
/// that validation can report them instead of the JSON extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdviceQuery {
    #[serde(default)]
    pub symbol: String,
    #[serde(rename = "userQuery", default)]
    pub user_query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdviceOutcome {
    pub symbol: String,
    pub advice: TradeSignal,
}
