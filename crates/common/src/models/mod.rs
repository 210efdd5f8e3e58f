pub mod advice;
pub mod feature_row;
pub mod signal;
pub mod symbol;

pub use advice::{AdviceOutcome, AdviceQuery};
pub use feature_row::{ChartDate, FeatureRow, PricePoint};
pub use signal::{Direction, RATIONALE_PLACEHOLDER, TradeSignal};
pub use symbol::Symbol;
