use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One warehouse observation for an instrument, keyed by column name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureRow(Map<String, Value>);

impl FeatureRow {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<Map<String, Value>> for FeatureRow {
    fn from(values: Map<String, Value>) -> Self {
        Self(values)
    }
}

/// Timestamp of a chart point, wrapped as `{"value": ...}` for the chart client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDate {
    pub value: Value,
}

/// A single (date, close) pair used by the price chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: ChartDate,
    pub close: Option<f64>,
}

impl PricePoint {
    pub fn new(date: Value, close: Option<f64>) -> Self {
        Self {
            date: ChartDate { value: date },
            close,
        }
    }
}
