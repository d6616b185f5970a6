//! Source text loading for uploaded documents.

use std::fs;
use std::path::Path;

use lopdf::Document;
use log::{info, warn};

use crate::debug_log;
use crate::error::ExtractError;

/// Shorter extracted text is not enough to build a quiz from.
pub const MIN_TEXT_LENGTH: usize = 50;

const PDF_MAGIC: &[u8] = b"%PDF";
const TEXT_EXTENSIONS: [&str; 3] = ["txt", "text", "md"];

/// Read a PDF or plain-text file and return its text content.
pub fn load_source<P: AsRef<Path>>(path: P) -> Result<String, ExtractError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    info!("Loading source document {} ({} bytes)", path.display(), bytes.len());

    if extension == "pdf" || bytes.starts_with(PDF_MAGIC) {
        extract_pdf_text(&bytes)
    } else if TEXT_EXTENSIONS.contains(&extension.as_str()) {
        let text = String::from_utf8(bytes)
            .map_err(|_| ExtractError::UnsupportedFormat(path.display().to_string()))?;
        check_length(text.trim().to_string())
    } else {
        Err(ExtractError::UnsupportedFormat(path.display().to_string()))
    }
}

/// Extract the text of every readable page.
///
/// Pages that fail to decode are skipped rather than failing the document.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(ExtractError::UnsupportedFormat("not a PDF document".to_string()));
    }
    let document = Document::load_mem(bytes)?;
    let pages = document.get_pages();
    if pages.is_empty() {
        return Err(ExtractError::EmptyDocument);
    }

    let mut page_texts = Vec::with_capacity(pages.len());
    for &page_number in pages.keys() {
        match document.extract_text(&[page_number]) {
            Ok(text) => {
                let text = normalize_whitespace(&text);
                debug_log!("Page {} yielded {} characters", page_number, text.len());
                if !text.is_empty() {
                    page_texts.push(text);
                }
            }
            Err(e) => warn!("Failed to extract text from page {page_number}: {e}"),
        }
    }

    check_length(page_texts.join("\n\n"))
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn check_length(text: String) -> Result<String, ExtractError> {
    let found = text.chars().count();
    if found < MIN_TEXT_LENGTH {
        return Err(ExtractError::InsufficientText { found });
    }
    Ok(text)
}
