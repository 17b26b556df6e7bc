use anyhow::Context;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use sha2::{Digest, Sha256};

use crate::config::{EMBEDDING_DIMENSION, EMBEDDING_MODEL_NAME};

/// Sentence-embedding backend.
///
/// `Model` wraps fastembed's all-MiniLM-L6-v2 (384-dim). `Stub` produces
/// deterministic hash-based vectors for offline/test use, selected by
/// `CYBERSENSE_EMBED_STUB=1` or when the real model cannot be loaded.
///
/// The same `Embedder` serves both the ingest and the query path; mixing
/// backends across the two degrades retrieval quality, which is why the
/// active model name is recorded in the index and checked at query time.
pub enum Embedder {
    Model(Box<TextEmbedding>),
    Stub,
}

impl Embedder {
    /// Initialize the embedder, falling back to the stub when the model
    /// is unavailable.
    #[must_use]
    pub fn new() -> Self {
        if std::env::var("CYBERSENSE_EMBED_STUB")
            .map(|v| v == "1")
            .unwrap_or(false)
        {
            tracing::info!("stub embedder active (CYBERSENSE_EMBED_STUB=1)");
            return Self::Stub;
        }

        match TextEmbedding::try_new(
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false),
        ) {
            Ok(model) => Self::Model(Box::new(model)),
            Err(e) => {
                tracing::warn!("embedding model unavailable ({e}), falling back to stub");
                Self::Stub
            }
        }
    }

    /// Create a stub embedder directly. Intended for tests.
    #[must_use]
    pub fn stub() -> Self {
        Self::Stub
    }

    /// Embed a batch of text strings and return their vector representations.
    pub fn embed_batch(&mut self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        match self {
            Self::Model(model) => {
                let owned: Vec<String> = texts.iter().map(|s| (*s).to_string()).collect();
                let embeddings = model.embed(owned, None).context("Failed to embed texts")?;
                Ok(embeddings)
            }
            Self::Stub => Ok(texts.iter().map(|t| hash_embed(t)).collect()),
        }
    }

    /// Name of the active embedding backend, recorded in the index.
    #[must_use]
    pub fn model_name(&self) -> &'static str {
        match self {
            Self::Model(_) => EMBEDDING_MODEL_NAME,
            Self::Stub => "stub-sha256",
        }
    }

    /// Return the embedding dimension (384 for all-MiniLM-L6-v2).
    #[must_use]
    pub const fn dimension() -> usize {
        EMBEDDING_DIMENSION
    }
}

impl Default for Embedder {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic 384-dim vector from the SHA-256 of the text.
/// Identical text always maps to the identical vector.
fn hash_embed(text: &str) -> Vec<f32> {
    let digest = Sha256::digest(text.as_bytes());
    (0..EMBEDDING_DIMENSION)
        .map(|i| {
            let byte = f32::from(digest[i % 32]);
            (byte / 255.0) * 2.0 - 1.0
        })
        .collect()
}
