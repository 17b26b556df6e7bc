use std::path::Path;

use anyhow::Context;

/// Document formats the ingestor can extract text from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    PlainText,
}

/// Classify a file by extension. Returns `None` for unsupported files.
#[must_use]
pub fn detect_format(path: &Path) -> Option<DocumentFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some(DocumentFormat::Pdf),
        "txt" | "md" => Some(DocumentFormat::PlainText),
        _ => None,
    }
}

/// Extract the plain text of a document.
///
/// PDF pages are concatenated with newlines by the extractor. The result
/// may still be empty (image-only or encrypted PDFs); callers decide
/// whether an empty document is worth a warning.
pub fn extract_text(path: &Path) -> anyhow::Result<String> {
    match detect_format(path) {
        Some(DocumentFormat::Pdf) => pdf_extract::extract_text(path)
            .map_err(|e| anyhow::anyhow!("Failed to extract text from {}: {e}", path.display())),
        Some(DocumentFormat::PlainText) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => anyhow::bail!("Unsupported document format: {}", path.display()),
    }
}
