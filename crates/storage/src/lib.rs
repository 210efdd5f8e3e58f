pub mod db;
pub mod repositories;
pub mod warehouse;

pub use warehouse::{CHART_WINDOW, FEATURE_WINDOW, Warehouse};
