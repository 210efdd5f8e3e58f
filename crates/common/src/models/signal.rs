use std::fmt;

use serde::{Deserialize, Serialize};

/// Shown in place of a rationale the model did not provide.
pub const RATIONALE_PLACEHOLDER: &str = "No rationale provided.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// Exact, case-sensitive match against `LONG` / `SHORT`.
    pub fn from_exact(raw: &str) -> Option<Self> {
        match raw {
            "LONG" => Some(Self::Long),
            "SHORT" => Some(Self::Short),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Long => "LONG",
            Self::Short => "SHORT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeSignal {
    pub signal: Direction,
    pub rationale: String,
}

impl TradeSignal {
    pub fn new(signal: Direction, rationale: Option<String>) -> Self {
        let rationale = rationale
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| RATIONALE_PLACEHOLDER.to_string());
        Self { signal, rationale }
    }
}
