use crate::domain::{DomainError, ExportFormat};

/// Serializes a response string into an export format.
pub trait DocumentWriter: Send + Sync {
    fn format(&self) -> ExportFormat;

    fn render(&self, content: &str) -> Result<Vec<u8>, DomainError>;
}
