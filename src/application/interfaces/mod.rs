mod document_writer;
mod model_client;

pub use document_writer::*;
pub use model_client::*;
