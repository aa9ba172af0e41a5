use std::path::PathBuf;

use anyhow::Result;

use crate::domain::{ConversationSession, ExportFormat, TaskLabel};

use super::super::Container;
use super::progress::with_spinner;

/// One-shot question: a fresh session holding a single exchange.
pub struct AskController<'a> {
    container: &'a Container,
}

impl<'a> AskController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn ask(
        &self,
        text: String,
        task: Option<String>,
        export_text: Option<PathBuf>,
        export_docx: Option<PathBuf>,
    ) -> Result<String> {
        let task = task.map(|t| t.parse::<TaskLabel>()).transpose()?;

        let mut session = ConversationSession::new();
        let use_case = self.container.chat_use_case();
        let message = format!("Asking {}...", self.container.service_name());
        let reply = with_spinner(&message, use_case.execute(&mut session, &text, task)).await;

        let mut output = reply.content().to_string();

        let export = self.container.export_use_case();
        let targets = [(ExportFormat::Text, export_text), (ExportFormat::Docx, export_docx)];
        for (format, path) in targets {
            if let Some(path) = path {
                let artifact = export.write_to(&session, format, &path).await?;
                output.push_str(&format!(
                    "\n\n[saved {} ({}) to {}]",
                    artifact.file_name(),
                    artifact.mime_type(),
                    path.display()
                ));
            }
        }

        Ok(output)
    }
}
