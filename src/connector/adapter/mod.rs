mod completion_client;
mod docx_writer;
mod foundation_model_client;
mod mock_model_client;
mod sigv4;
mod text_writer;

pub use completion_client::*;
pub use docx_writer::*;
pub use foundation_model_client::*;
pub use mock_model_client::*;
pub use sigv4::{AwsCredentials, SigV4Signer};
pub use text_writer::*;
