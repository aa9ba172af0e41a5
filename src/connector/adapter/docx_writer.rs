use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::application::DocumentWriter;
use crate::domain::{DomainError, ExportFormat};

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_HEAD: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r>"#;

const DOCUMENT_TAIL: &str = "</w:r></w:p></w:body></w:document>";

/// Minimal word-processing document: one paragraph, one run.
///
/// Line breaks inside the response become `<w:br/>` and tabs `<w:tab/>`, so the
/// text keeps its shape without being split into several paragraphs.
pub struct DocxWriter;

impl DocxWriter {
    pub fn document_xml(content: &str) -> String {
        let mut xml = String::with_capacity(DOCUMENT_HEAD.len() + content.len() + 64);
        xml.push_str(DOCUMENT_HEAD);

        for (i, line) in content.split('\n').enumerate() {
            if i > 0 {
                xml.push_str("<w:br/>");
            }
            for (j, piece) in line.split('\t').enumerate() {
                if j > 0 {
                    xml.push_str("<w:tab/>");
                }
                if !piece.is_empty() {
                    xml.push_str(r#"<w:t xml:space="preserve">"#);
                    xml.push_str(&escape_xml(piece));
                    xml.push_str("</w:t>");
                }
            }
        }

        xml.push_str(DOCUMENT_TAIL);
        xml
    }
}

impl DocumentWriter for DocxWriter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Docx
    }

    fn render(&self, content: &str) -> Result<Vec<u8>, DomainError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        let parts = [
            ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
            ("_rels/.rels", RELS_XML.to_string()),
            ("word/document.xml", Self::document_xml(content)),
        ];

        for (name, body) in parts {
            writer
                .start_file(name, options)
                .map_err(|e| DomainError::export(format!("Failed to start {}: {}", name, e)))?;
            writer
                .write_all(body.as_bytes())
                .map_err(|e| DomainError::export(format!("Failed to write {}: {}", name, e)))?;
        }

        let cursor = writer
            .finish()
            .map_err(|e| DomainError::export(format!("Failed to finalize archive: {}", e)))?;
        Ok(cursor.into_inner())
    }
}

/// Escapes markup characters and drops characters XML 1.0 cannot carry.
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\r' => {}
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}
