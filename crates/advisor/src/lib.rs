pub mod remote;
pub mod services;

pub use remote::GeminiClient;
pub use services::advice_generator::AdviceGenerator;
pub use services::signal_parser::{parse_signal, strip_fences};
