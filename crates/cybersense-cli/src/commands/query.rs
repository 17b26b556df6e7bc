use std::io::{BufRead, Write};

use cybersense_lib::embedding::embedder::Embedder;
use cybersense_lib::output::ConsoleIO;
use cybersense_lib::retrieve::retrieve_top_k;
use cybersense_lib::runtime::Runtime;

/// Run the `cybersense query` command: retrieval only, no generation.
pub fn run_query<IN, OUT, ERR>(
    text: &str,
    k: usize,
    runtime: &Runtime,
    io: &mut dyn ConsoleIO<IN, OUT, ERR>,
) -> anyhow::Result<()>
where
    IN: BufRead,
    OUT: Write,
    ERR: Write,
{
    let conn = runtime.db.open()?;
    let mut embedder = Embedder::new();

    let hits = retrieve_top_k(&conn, &mut embedder, text, k)?;

    if hits.is_empty() {
        writeln!(io.stdout(), "No matching chunks found.")?;
        return Ok(());
    }

    for (i, hit) in hits.iter().enumerate() {
        writeln!(
            io.stdout(),
            "{}. {} [chunk {}] (distance: {:.4})",
            i + 1,
            hit.source,
            hit.chunk_index,
            hit.score
        )?;
        writeln!(io.stdout(), "   {}", hit.text)?;
    }

    Ok(())
}
