use rusqlite::Connection;
use tracing::warn;

use crate::db::queries::{get_meta, search_chunks};
use crate::embedding::embedder::Embedder;

/// A single retrieval result.
///
/// `score` is a cosine distance: lower means more similar. It is not a
/// normalized probability.
#[derive(Debug, Clone)]
pub struct Hit {
    /// Chunk text.
    pub text: String,
    /// Originating document identifier.
    pub source: String,
    /// Chunk position within the source document.
    pub chunk_index: usize,
    /// Cosine distance from the query embedding.
    pub score: f64,
}

/// Retrieve the top-k chunks nearest to the query.
///
/// Embeds the query with the same model used at ingest time, searches the
/// index, and maps the rows to [`Hit`]s preserving ascending-distance
/// order. An empty index or fewer than `k` matches yields a short or empty
/// list; that is expected near corpus edges, not an error.
pub fn retrieve_top_k(
    conn: &Connection,
    embedder: &mut Embedder,
    query: &str,
    k: usize,
) -> anyhow::Result<Vec<Hit>> {
    if let Some(indexed_model) = get_meta(conn, "embedding_model")? {
        if indexed_model != embedder.model_name() {
            warn!(
                "index was built with embedding model '{indexed_model}' but queries use \
                 '{}'; retrieval quality will degrade",
                embedder.model_name()
            );
        }
    }

    let embeddings = embedder.embed_batch(&[query])?;
    let query_embedding = &embeddings[0];

    let results = search_chunks(conn, query_embedding, k)?;

    Ok(results
        .into_iter()
        .map(|r| Hit {
            text: r.content,
            source: r.source,
            chunk_index: r.chunk_index,
            score: r.distance,
        })
        .collect())
}
