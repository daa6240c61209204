//! Source material a quiz is generated from.

mod document;
mod web;

use std::fmt;
use std::path::{Path, PathBuf};

use log::info;
use reqwest::Client;
use thiserror::Error;

pub use document::extract_document_text;
pub use web::{fetch_link, html_to_text};

/// Extracted text beyond this many characters is dropped before prompting.
pub const MAX_SOURCE_CHARS: usize = 30_000;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("unsupported file type: {0} (use .txt, .md, .docx or .pdf)")]
    UnsupportedFileType(String),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read document archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("failed to read PDF: {0}")]
    Pdf(String),

    #[error("failed to fetch {url}: {source}")]
    Fetch { url: String, source: reqwest::Error },

    #[error("{url} returned {status}")]
    Status { url: String, status: u16 },

    #[error("no readable text found in {0}")]
    Empty(String),

    #[error("the topic is empty")]
    EmptyTopic,
}

/// Where the material comes from, before anything is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    File(PathBuf),
    Link(String),
    Topic(String),
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceSpec::File(path) => write!(f, "document {}", path.display()),
            SourceSpec::Link(url) => write!(f, "link {}", url),
            SourceSpec::Topic(topic) => write!(f, "topic \"{}\"", topic),
        }
    }
}

/// Material ready to be embedded in a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMaterial {
    Document { name: String, text: String },
    Link { url: String, text: String },
    Topic(String),
}

impl SourceMaterial {
    pub fn label(&self) -> String {
        match self {
            SourceMaterial::Document { name, text } => {
                format!("document {} ({} chars)", name, text.chars().count())
            }
            SourceMaterial::Link { url, text } => {
                format!("link {} ({} chars)", url, text.chars().count())
            }
            SourceMaterial::Topic(topic) => format!("topic \"{}\"", topic),
        }
    }
}

/// Read, fetch or pass through the source so it can be prompted with.
pub async fn resolve(client: &Client, spec: &SourceSpec) -> Result<SourceMaterial, SourceError> {
    match spec {
        SourceSpec::File(path) => {
            let bytes = tokio::fs::read(path).await.map_err(|source| SourceError::Read {
                path: path.clone(),
                source,
            })?;
            let text = extract_document_text(path, &bytes)?;
            info!("Extracted {} chars from {}", text.chars().count(), path.display());
            Ok(SourceMaterial::Document {
                name: file_name(path),
                text: truncate_chars(&text, MAX_SOURCE_CHARS),
            })
        }
        SourceSpec::Link(url) => {
            let text = fetch_link(client, url).await?;
            Ok(SourceMaterial::Link {
                url: url.clone(),
                text: truncate_chars(&text, MAX_SOURCE_CHARS),
            })
        }
        SourceSpec::Topic(topic) => {
            let topic = topic.trim();
            if topic.is_empty() {
                return Err(SourceError::EmptyTopic);
            }
            Ok(SourceMaterial::Topic(topic.to_string()))
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Keep at most `max` characters, never splitting a UTF-8 sequence.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
