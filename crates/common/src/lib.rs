pub mod config;
pub mod errors;
pub mod logger;
pub mod models;
pub mod traits;

pub use errors::{AdviceError, ModelError, SignalError, Stage, WarehouseError};
