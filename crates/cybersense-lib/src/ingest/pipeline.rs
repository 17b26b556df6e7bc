use std::path::Path;

use anyhow::Context;
use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::db::queries::{delete_document, set_meta, upsert_chunk};
use crate::embedding::embedder::Embedder;
use crate::ingest::chunker::chunk_document;
use crate::ingest::extract::{detect_format, extract_text};

/// Outcome of a batch ingestion run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Documents successfully indexed.
    pub documents: usize,
    /// Total chunks written for those documents.
    pub chunks: usize,
    /// Supported documents skipped because extraction failed or yielded no text.
    pub skipped: usize,
}

/// Run the batch ingestion pipeline over a document directory.
///
/// For every supported file: extract text, split into overlapping chunks,
/// embed the chunks as one batch, and replace the source's index records.
/// A single file's extraction failure is logged and skipped; it never
/// aborts the batch. Embedding and storage failures do abort, since they
/// indicate the index itself is unusable.
pub fn ingest_directory(
    conn: &Connection,
    embedder: &mut Embedder,
    dir: &Path,
) -> anyhow::Result<IngestReport> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read document directory: {}", dir.display()))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let mut report = IngestReport::default();

    for path in &paths {
        if detect_format(path).is_none() {
            debug!("Ignoring unsupported file: {}", path.display());
            continue;
        }

        let source = path
            .file_name()
            .map_or_else(|| path.to_string_lossy().into_owned(), |n| {
                n.to_string_lossy().into_owned()
            });

        let text = match extract_text(path) {
            Ok(text) => text,
            Err(e) => {
                warn!("Skipping {source}: {e}");
                report.skipped += 1;
                continue;
            }
        };

        if text.trim().is_empty() {
            warn!("Skipping {source}: no extractable text");
            report.skipped += 1;
            continue;
        }

        let chunks = chunk_document(&source, &text)?;
        if chunks.is_empty() {
            warn!("Skipping {source}: splitting produced no chunks");
            report.skipped += 1;
            continue;
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = embedder
            .embed_batch(&texts)
            .with_context(|| format!("Failed to embed chunks for {source}"))?;

        // Replace, not append: clear the source's records first so a
        // re-ingested document that shrank leaves no stale chunks.
        delete_document(conn, &source)?;
        for (chunk, embedding) in chunks.iter().zip(embeddings.iter()) {
            upsert_chunk(
                conn,
                &chunk.id(),
                &chunk.source,
                chunk.index,
                &chunk.text,
                embedding,
            )?;
        }

        info!("Indexed {source}: {} chunks", chunks.len());
        report.documents += 1;
        report.chunks += chunks.len();
    }

    set_meta(conn, "embedding_model", embedder.model_name())?;

    info!(
        "Ingestion complete: {} documents, {} chunks, {} skipped",
        report.documents, report.chunks, report.skipped
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::driver::DatabaseDriver;
    use crate::db::queries::{count_chunks, get_meta, list_sources, search_chunks};

    fn setup_test() -> (tempfile::TempDir, Connection, Embedder) {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("test.db");
        let driver = DatabaseDriver::file(db_path);
        let conn = driver.open().unwrap();
        (tmp, conn, Embedder::stub())
    }

    fn write_doc(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn ingests_text_documents() {
        let (tmp, conn, mut embedder) = setup_test();
        let docs = tmp.path().join("docs");
        std::fs::create_dir(&docs).unwrap();
        write_doc(&docs, "it_act.txt", "Section 66E penalizes violation of privacy.");
        write_doc(&docs, "ipc.md", "Identity theft is covered by Section 66C.");

        let report = ingest_directory(&conn, &mut embedder, &docs).unwrap();
        assert_eq!(report.documents, 2);
        assert_eq!(report.chunks, 2);
        assert_eq!(report.skipped, 0);
        assert_eq!(count_chunks(&conn).unwrap(), 2);
        assert_eq!(
            list_sources(&conn).unwrap(),
            vec!["ipc.md".to_string(), "it_act.txt".to_string()]
        );
    }

    #[test]
    fn re_ingestion_is_idempotent() {
        let (tmp, conn, mut embedder) = setup_test();
        let docs = tmp.path().join("docs");
        std::fs::create_dir(&docs).unwrap();
        let body = "Cyber stalking provisions. ".repeat(80);
        write_doc(&docs, "act.txt", &body);

        let first = ingest_directory(&conn, &mut embedder, &docs).unwrap();
        let count_after_first = count_chunks(&conn).unwrap();

        let second = ingest_directory(&conn, &mut embedder, &docs).unwrap();
        assert_eq!(first, second);
        assert_eq!(count_chunks(&conn).unwrap(), count_after_first);

        // Retrieval over the re-ingested index is unchanged
        let query = embedder.embed_batch(&["Cyber stalking provisions."]).unwrap();
        let hits = search_chunks(&conn, &query[0], 3).unwrap();
        assert!(!hits.is_empty());
    }

    #[test]
    fn shrinking_document_leaves_no_stale_chunks() {
        let (tmp, conn, mut embedder) = setup_test();
        let docs = tmp.path().join("docs");
        std::fs::create_dir(&docs).unwrap();

        let long_body = "A sentence about data protection obligations. ".repeat(80);
        write_doc(&docs, "act.txt", &long_body);
        ingest_directory(&conn, &mut embedder, &docs).unwrap();
        let count_long = count_chunks(&conn).unwrap();
        assert!(count_long > 1);

        write_doc(&docs, "act.txt", "A single short sentence.");
        ingest_directory(&conn, &mut embedder, &docs).unwrap();
        assert_eq!(count_chunks(&conn).unwrap(), 1);
    }

    #[test]
    fn empty_file_is_skipped_with_warning() {
        let (tmp, conn, mut embedder) = setup_test();
        let docs = tmp.path().join("docs");
        std::fs::create_dir(&docs).unwrap();
        write_doc(&docs, "empty.txt", "   \n  ");
        write_doc(&docs, "real.txt", "Actual legal content.");

        let report = ingest_directory(&conn, &mut embedder, &docs).unwrap();
        assert_eq!(report.documents, 1);
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn corrupt_pdf_does_not_abort_the_batch() {
        let (tmp, conn, mut embedder) = setup_test();
        let docs = tmp.path().join("docs");
        std::fs::create_dir(&docs).unwrap();
        write_doc(&docs, "broken.pdf", "this is not a pdf");
        write_doc(&docs, "real.txt", "Actual legal content.");

        let report = ingest_directory(&conn, &mut embedder, &docs).unwrap();
        assert_eq!(report.documents, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(list_sources(&conn).unwrap(), vec!["real.txt".to_string()]);
    }

    #[test]
    fn unsupported_files_are_ignored_silently() {
        let (tmp, conn, mut embedder) = setup_test();
        let docs = tmp.path().join("docs");
        std::fs::create_dir(&docs).unwrap();
        write_doc(&docs, "image.png", "binary-ish");
        write_doc(&docs, "real.txt", "Actual legal content.");

        let report = ingest_directory(&conn, &mut embedder, &docs).unwrap();
        assert_eq!(report.documents, 1);
        assert_eq!(report.skipped, 0);
    }

    #[test]
    fn records_embedding_model_name() {
        let (tmp, conn, mut embedder) = setup_test();
        let docs = tmp.path().join("docs");
        std::fs::create_dir(&docs).unwrap();
        write_doc(&docs, "real.txt", "Actual legal content.");

        ingest_directory(&conn, &mut embedder, &docs).unwrap();
        assert_eq!(
            get_meta(&conn, "embedding_model").unwrap().as_deref(),
            Some("stub-sha256")
        );
    }

    #[test]
    fn missing_directory_is_an_error() {
        let (_tmp, conn, mut embedder) = setup_test();
        let err = ingest_directory(&conn, &mut embedder, Path::new("/nonexistent/docs"))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read document directory"));
    }
}
