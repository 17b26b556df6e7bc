use text_splitter::{ChunkConfig, TextSplitter};

use crate::config::{CHUNK_OVERLAP_CHARS, CHUNK_SIZE_CHARS};

/// A chunk of a source document, ready for embedding.
///
/// `index` values are contiguous and zero-based within a document, and the
/// identity `{source}_{index}` is unique across the index.
#[derive(Debug, Clone)]
pub struct DocumentChunk {
    /// Originating document identifier (file name).
    pub source: String,
    /// Sequential chunk position within the document (0-based).
    pub index: usize,
    /// The text content of this chunk.
    pub text: String,
}

impl DocumentChunk {
    /// Index record identity: `{source}_{index}`.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}_{}", self.source, self.index)
    }
}

/// Split a document's text into overlapping chunks.
///
/// Recursive length-based splitting: ~800 characters per chunk with a
/// 100-character overlap, preferring paragraph and sentence boundaries
/// before falling back to hard character cuts.
pub fn chunk_document(source: &str, text: &str) -> anyhow::Result<Vec<DocumentChunk>> {
    let config = ChunkConfig::new(CHUNK_SIZE_CHARS)
        .with_overlap(CHUNK_OVERLAP_CHARS)
        .map_err(|e| anyhow::anyhow!("Invalid chunk configuration: {e}"))?;
    let splitter = TextSplitter::new(config);

    Ok(splitter
        .chunks(text)
        .enumerate()
        .map(|(index, chunk)| DocumentChunk {
            source: source.to_string(),
            index,
            text: chunk.to_string(),
        })
        .collect())
}
