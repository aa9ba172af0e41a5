use crate::application::DocumentWriter;
use crate::domain::{DomainError, ExportFormat};

/// Raw UTF-8 bytes of the response.
pub struct PlainTextWriter;

impl DocumentWriter for PlainTextWriter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Text
    }

    fn render(&self, content: &str) -> Result<Vec<u8>, DomainError> {
        Ok(content.as_bytes().to_vec())
    }
}
