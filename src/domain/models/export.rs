use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

pub const TEXT_MIME: &str = "text/plain";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Text,
    Docx,
}

impl ExportFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Text => TEXT_MIME,
            ExportFormat::Docx => DOCX_MIME,
        }
    }

    pub fn default_file_name(&self) -> &'static str {
        match self {
            ExportFormat::Text => "response.txt",
            ExportFormat::Docx => "response.docx",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Text => "text",
            ExportFormat::Docx => "docx",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "docx" | "word" => Ok(ExportFormat::Docx),
            other => Err(DomainError::invalid_input(format!(
                "unknown export format '{}', expected text or docx",
                other
            ))),
        }
    }
}

/// A rendered export, ready to be written or offered for download.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    format: ExportFormat,
    bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn new(format: ExportFormat, bytes: Vec<u8>) -> Self {
        Self { format, bytes }
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn file_name(&self) -> &'static str {
        self.format.default_file_name()
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_metadata() {
        assert_eq!(ExportFormat::Text.mime_type(), "text/plain");
        assert_eq!(ExportFormat::Docx.default_file_name(), "response.docx");
        assert_eq!("TXT".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }
}
