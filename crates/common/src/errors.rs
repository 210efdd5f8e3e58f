use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Failures raised while talking to the feature warehouse.
#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error("warehouse unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("warehouse query timed out after {0:?}")]
    QueryTimeout(Duration),
}

/// Failures raised by the generative model transport.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model unavailable: {0}")]
    Unavailable(String),
    #[error("model call timed out after {0:?}")]
    Timeout(Duration),
}

/// The model answered, but the content cannot be turned into a signal.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed model output: {0}")]
pub struct SignalError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validate,
    FetchFeatures,
    GenerateAdvice,
    ParseSignal,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validate => "validate",
            Self::FetchFeatures => "fetch_features",
            Self::GenerateAdvice => "generate_advice",
            Self::ParseSignal => "parse_signal",
        };
        f.write_str(name)
    }
}

/// Outcome of a failed advice request, tagged with the stage it came from.
#[derive(Debug, Error)]
pub enum AdviceError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("no recent data found for symbol '{0}'")]
    NoDataForInstrument(String),
    #[error(transparent)]
    Warehouse(#[from] WarehouseError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    MalformedModelOutput(#[from] SignalError),
}

impl AdviceError {
    pub fn stage(&self) -> Stage {
        match self {
            Self::InvalidRequest(_) => Stage::Validate,
            Self::NoDataForInstrument(_) | Self::Warehouse(_) => Stage::FetchFeatures,
            Self::Model(_) => Stage::GenerateAdvice,
            Self::MalformedModelOutput(_) => Stage::ParseSignal,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "InvalidRequest",
            Self::NoDataForInstrument(_) => "NoDataForInstrument",
            Self::Warehouse(WarehouseError::UpstreamUnavailable(_)) => "UpstreamUnavailable",
            Self::Warehouse(WarehouseError::QueryTimeout(_)) => "QueryTimeout",
            Self::Model(ModelError::Unavailable(_)) => "ModelUnavailable",
            Self::Model(ModelError::Timeout(_)) => "ModelTimeout",
            Self::MalformedModelOutput(_) => "MalformedModelOutput",
        }
    }

    /// HTTP status reported to the caller.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidRequest(_) => 400,
            Self::NoDataForInstrument(_) => 404,
            _ => 500,
        }
    }
}
