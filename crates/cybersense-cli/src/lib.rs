pub mod cli;
pub mod commands;
pub mod logging;

#[cfg(test)]
pub mod test_util;

use std::io::{BufRead, Write};

use clap::Parser;

use cybersense_lib::output::ConsoleIO;
use cybersense_lib::runtime::Runtime;

use cli::{Cli, Command};

/// Main CLI entry point. Parses args and dispatches to the appropriate command.
pub fn try_run<IN, OUT, ERR>(
    args: &[&str],
    runtime: &Runtime,
    io: &mut dyn ConsoleIO<IN, OUT, ERR>,
) -> anyhow::Result<()>
where
    IN: BufRead,
    OUT: Write,
    ERR: Write,
{
    let cli = Cli::try_parse_from(args)?;

    match cli.command {
        Command::Ingest { dir } => commands::ingest::run_ingest(dir.as_deref(), runtime, io),
        Command::Query { text, k } => commands::query::run_query(&text, k, runtime, io),
        Command::Ask { question, k } => commands::ask::run_ask(&question, k, runtime, io),
        Command::Chat { k } => commands::chat::run_chat(k, runtime, io),
    }
}
