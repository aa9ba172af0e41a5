use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::application::DocumentWriter;
use crate::domain::{ConversationSession, DomainError, ExportArtifact, ExportFormat};

/// Renders the session's last assistant answer (not the whole history) into an
/// export format.
pub struct ExportResponseUseCase {
    writers: HashMap<ExportFormat, Arc<dyn DocumentWriter>>,
}

impl ExportResponseUseCase {
    pub fn new(writers: Vec<Arc<dyn DocumentWriter>>) -> Self {
        Self {
            writers: writers.into_iter().map(|w| (w.format(), w)).collect(),
        }
    }

    pub fn execute(
        &self,
        session: &ConversationSession,
        format: ExportFormat,
    ) -> Result<ExportArtifact, DomainError> {
        let last = session
            .last_assistant()
            .ok_or_else(|| DomainError::not_found("no response to export yet"))?;

        let writer = self
            .writers
            .get(&format)
            .ok_or_else(|| DomainError::export(format!("no writer registered for {}", format)))?;

        let bytes = writer.render(last.content())?;
        Ok(ExportArtifact::new(format, bytes))
    }

    /// Renders and writes the artifact to `path`, creating parent directories.
    pub async fn write_to(
        &self,
        session: &ConversationSession,
        format: ExportFormat,
        path: &Path,
    ) -> Result<ExportArtifact, DomainError> {
        let artifact = self.execute(session, format)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(path, artifact.bytes()).await?;

        info!(
            "Exported last response as {} ({} bytes) to {}",
            artifact.mime_type(),
            artifact.bytes().len(),
            path.display()
        );
        Ok(artifact)
    }
}
