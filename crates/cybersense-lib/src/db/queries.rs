#![allow(
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

use anyhow::Context;
use rusqlite::{params, Connection, OptionalExtension};
use zerocopy::AsBytes;

/// Insert or replace an index record.
///
/// Records are keyed by `chunk_id` (`{source}_{index}`), so re-ingesting the
/// same document replaces its chunks instead of duplicating them.
pub fn upsert_chunk(
    conn: &Connection,
    chunk_id: &str,
    source: &str,
    chunk_index: usize,
    content: &str,
    embedding: &[f32],
) -> anyhow::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO chunks (chunk_id, source, chunk_index, content, embedding)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            chunk_id,
            source,
            chunk_index as i64,
            content,
            embedding.as_bytes(),
        ],
    )
    .with_context(|| format!("Failed to upsert chunk {chunk_id}"))?;
    Ok(())
}

/// Delete all index records for a source document.
/// Used before re-inserting so a shrinking document leaves no stale chunks.
pub fn delete_document(conn: &Connection, source: &str) -> anyhow::Result<usize> {
    let deleted = conn
        .execute("DELETE FROM chunks WHERE source = ?1", params![source])
        .with_context(|| format!("Failed to delete chunks for {source}"))?;
    Ok(deleted)
}

/// Total number of index records.
pub fn count_chunks(conn: &Connection) -> anyhow::Result<usize> {
    let count: i64 = conn
        .query_row("SELECT count(*) FROM chunks", [], |row| row.get(0))
        .context("Failed to count chunks")?;
    Ok(count as usize)
}

/// Distinct source documents present in the index, sorted by name.
pub fn list_sources(conn: &Connection) -> anyhow::Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT DISTINCT source FROM chunks ORDER BY source")
        .context("Failed to prepare list_sources query")?;
    let sources = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()
        .context("Failed to list sources")?;
    Ok(sources)
}

/// A search result from vector similarity search.
#[derive(Debug)]
pub struct ChunkSearchResult {
    pub source: String,
    pub chunk_index: usize,
    pub content: String,
    pub distance: f64,
}

/// Search for the top-k nearest chunks by cosine distance, ascending.
///
/// A brute-force scan over the whole table; there is no approximate index.
/// An empty table yields an empty result, never an error.
pub fn search_chunks(
    conn: &Connection,
    query_embedding: &[f32],
    k: usize,
) -> anyhow::Result<Vec<ChunkSearchResult>> {
    let mut stmt = conn.prepare(
        "SELECT source, chunk_index, content,
                vec_distance_cosine(embedding, ?1) AS distance
         FROM chunks
         ORDER BY distance ASC
         LIMIT ?2",
    )?;

    let results = stmt
        .query_map(params![query_embedding.as_bytes(), k as i64], |row| {
            Ok(ChunkSearchResult {
                source: row.get(0)?,
                chunk_index: row.get::<_, i64>(1)? as usize,
                content: row.get(2)?,
                distance: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to search chunks")?;

    Ok(results)
}

/// Read a value from the `index_meta` table. Returns `None` if absent.
pub fn get_meta(conn: &Connection, key: &str) -> anyhow::Result<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM index_meta WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .with_context(|| format!("Failed to read meta key {key}"))?;
    Ok(value)
}

/// Insert or update a value in the `index_meta` table.
pub fn set_meta(conn: &Connection, key: &str, value: &str) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO index_meta (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )
    .with_context(|| format!("Failed to set meta key {key}"))?;
    Ok(())
}
