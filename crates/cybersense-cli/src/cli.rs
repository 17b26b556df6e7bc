use clap::{Parser, Subcommand};

use cybersense_lib::config::DEFAULT_TOP_K;

#[derive(Parser, Debug)]
#[command(name = "cybersense", about = "Retrieval-augmented cyber-law assistant")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Index a directory of reference documents (PDF, txt, md).
    Ingest {
        /// Directory holding the documents. Defaults to `<root>/data`.
        dir: Option<String>,
    },

    /// Search indexed chunks by semantic similarity (no generation).
    Query {
        /// The text to search for.
        text: String,
        /// Number of results to return.
        #[arg(short, long, default_value_t = DEFAULT_TOP_K)]
        k: usize,
    },

    /// Ask a single question and print the generated answer with sources.
    Ask {
        /// The question to answer.
        question: String,
        /// Number of context chunks to retrieve.
        #[arg(short, long, default_value_t = DEFAULT_TOP_K)]
        k: usize,
    },

    /// Interactive question-answering session with in-session history.
    Chat {
        /// Number of context chunks to retrieve per question.
        #[arg(short, long, default_value_t = DEFAULT_TOP_K)]
        k: usize,
    },
}
