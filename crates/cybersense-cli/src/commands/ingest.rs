use std::io::{BufRead, Write};
use std::path::PathBuf;

use cybersense_lib::embedding::embedder::Embedder;
use cybersense_lib::ingest::pipeline::ingest_directory;
use cybersense_lib::output::ConsoleIO;
use cybersense_lib::runtime::Runtime;

/// Run the `cybersense ingest` command.
pub fn run_ingest<IN, OUT, ERR>(
    dir: Option<&str>,
    runtime: &Runtime,
    io: &mut dyn ConsoleIO<IN, OUT, ERR>,
) -> anyhow::Result<()>
where
    IN: BufRead,
    OUT: Write,
    ERR: Write,
{
    let dir = dir.map_or_else(|| runtime.context.docs_dir(), PathBuf::from);
    if !dir.is_dir() {
        anyhow::bail!("Document directory not found: {}", dir.display());
    }

    let conn = runtime.db.open()?;
    let mut embedder = Embedder::new();

    let report = ingest_directory(&conn, &mut embedder, &dir)?;

    writeln!(
        io.stdout(),
        "Indexed {} documents ({} chunks, {} skipped).",
        report.documents,
        report.chunks,
        report.skipped
    )?;
    Ok(())
}
