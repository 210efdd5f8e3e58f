pub mod gemini_client;
pub mod gemini_types;

pub use gemini_client::GeminiClient;
pub use gemini_types::{GeminiRequest, GeminiResponse};
