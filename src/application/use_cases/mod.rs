mod chat;
mod export_response;
mod input_validator;
mod intent_detector;
mod prompt_formatter;
mod response_normalizer;

pub use chat::*;
pub use export_response::*;
pub use input_validator::*;
pub use intent_detector::*;
pub use prompt_formatter::*;
pub use response_normalizer::*;
