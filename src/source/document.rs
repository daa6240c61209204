use std::io::{Cursor, Read};
use std::path::Path;

use zip::ZipArchive;

use super::web::{collapse_whitespace, strip_tags};
use super::SourceError;

const DOCX_BODY: &str = "word/document.xml";

/// Pull plain text out of a document's bytes, choosing a reader by extension.
pub fn extract_document_text(path: &Path, bytes: &[u8]) -> Result<String, SourceError> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let text = match extension.as_str() {
        "txt" | "md" | "markdown" => String::from_utf8_lossy(bytes).into_owned(),
        "docx" => docx_text(bytes)?,
        "pdf" => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| SourceError::Pdf(e.to_string()))?,
        "" => return Err(SourceError::UnsupportedFileType("(no extension)".to_string())),
        other => return Err(SourceError::UnsupportedFileType(format!(".{}", other))),
    };

    let text = collapse_whitespace(&text);
    if text.is_empty() {
        return Err(SourceError::Empty(path.display().to_string()));
    }
    Ok(text)
}

fn docx_text(bytes: &[u8]) -> Result<String, SourceError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY)?
        .read_to_string(&mut xml)
        .map_err(|source| SourceError::Read {
            path: DOCX_BODY.into(),
            source,
        })?;

    let paragraphs: Vec<String> = xml
        .split("</w:p>")
        .map(|paragraph| strip_tags(&paragraph.replace("<w:tab/>", " ")).trim().to_string())
        .filter(|paragraph| !paragraph.is_empty())
        .collect();

    Ok(paragraphs.join("\n"))
}
