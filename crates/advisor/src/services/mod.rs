pub mod advice_generator;
pub mod signal_parser;
