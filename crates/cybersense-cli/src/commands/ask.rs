use std::io::{BufRead, Write};

use tracing::error;

use cybersense_lib::answer::answer_question;
use cybersense_lib::embedding::embedder::Embedder;
use cybersense_lib::error::GenerationError;
use cybersense_lib::generate::{AnswerGenerator, GeminiClient};
use cybersense_lib::output::ConsoleIO;
use cybersense_lib::retrieve::Hit;
use cybersense_lib::runtime::Runtime;

/// Run the `cybersense ask` command with the configured Gemini client.
pub fn run_ask<IN, OUT, ERR>(
    question: &str,
    k: usize,
    runtime: &Runtime,
    io: &mut dyn ConsoleIO<IN, OUT, ERR>,
) -> anyhow::Result<()>
where
    IN: BufRead,
    OUT: Write,
    ERR: Write,
{
    let generator = GeminiClient::from_env()?;
    run_ask_with(question, k, &generator, runtime, io)
}

/// Run a single question against the index with an explicit generator.
pub fn run_ask_with<IN, OUT, ERR>(
    question: &str,
    k: usize,
    generator: &dyn AnswerGenerator,
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

    match answer_question(&conn, &mut embedder, generator, question, &[], k) {
        Ok(answer) => {
            writeln!(io.stdout(), "{}", answer.response)?;
            if !answer.hits.is_empty() {
                writeln!(io.stdout())?;
                writeln!(io.stdout(), "Sources:")?;
                write_sources(io.stdout(), &answer.hits)?;
            }
            Ok(())
        }
        Err(e) => match e.downcast::<GenerationError>() {
            // The user sees a generic message; the detail goes to the log.
            Ok(generation) => {
                error!(error = format!("{generation:?}"), "answer generation failed");
                writeln!(io.stdout(), "{}", generation.user_message())?;
                Ok(())
            }
            Err(other) => Err(other),
        },
    }
}

/// Write one source line per hit, in retrieval order.
pub fn write_sources(out: &mut dyn Write, hits: &[Hit]) -> anyhow::Result<()> {
    for hit in hits {
        writeln!(
            out,
            "- {} [chunk {}] (distance: {:.4})",
            hit.source, hit.chunk_index, hit.score
        )?;
    }
    Ok(())
}
