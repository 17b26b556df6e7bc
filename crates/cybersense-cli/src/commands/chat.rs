use std::io::{BufRead, Write};

use tracing::error;

use cybersense_lib::answer::answer_question;
use cybersense_lib::embedding::embedder::Embedder;
use cybersense_lib::error::GenerationError;
use cybersense_lib::generate::{AnswerGenerator, GeminiClient};
use cybersense_lib::history::Turn;
use cybersense_lib::output::ConsoleIO;
use cybersense_lib::runtime::Runtime;

/// Run the `cybersense chat` command with the configured Gemini client.
pub fn run_chat<IN, OUT, ERR>(
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
    run_chat_with(k, &generator, runtime, io)
}

/// Interactive REPL over the index with an explicit generator.
///
/// History lives only in this session and is injected into each prompt as
/// flat text. `exit`, `quit`, or end of input ends the session.
pub fn run_chat_with<IN, OUT, ERR>(
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
    let mut history: Vec<Turn> = Vec::new();

    writeln!(io.stdout(), "CyberSense chat. Type 'exit' to quit.")?;

    loop {
        write!(io.stdout(), "> ")?;
        io.stdout().flush()?;

        let mut line = String::new();
        if io.stdin().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question == "exit" || question == "quit" {
            break;
        }

        let reply = match answer_question(&conn, &mut embedder, generator, question, &history, k)
        {
            Ok(answer) => {
                if !answer.hits.is_empty() {
                    let sources: Vec<String> = answer
                        .hits
                        .iter()
                        .map(|h| format!("{}#{}", h.source, h.chunk_index))
                        .collect();
                    writeln!(io.stdout(), "[sources: {}]", sources.join(", "))?;
                }
                answer.response
            }
            Err(e) => match e.downcast::<GenerationError>() {
                Ok(generation) => {
                    error!(error = format!("{generation:?}"), "chat generation failed");
                    generation.user_message().to_string()
                }
                Err(other) => return Err(other),
            },
        };

        writeln!(io.stdout(), "{reply}")?;
        writeln!(io.stdout())?;

        history.push(Turn::user(question));
        history.push(Turn::assistant(reply));
    }

    Ok(())
}
