use std::path::PathBuf;

use cybersense_lib::context::CyberSenseContext;
use cybersense_lib::db::driver::DatabaseDriver;
use cybersense_lib::output::StdIO;
use cybersense_lib::runtime::Runtime;

fn main() -> anyhow::Result<()> {
    // 1. Load .env and read environment
    dotenv::dotenv().ok();
    let cwd = std::env::current_dir()?;
    let log_dir = std::env::var("CYBERSENSE_LOG_DIR").ok().map(PathBuf::from);
    let context = CyberSenseContext::with_log_dir(cwd, log_dir);

    // 2. Init file logging (no-op if log_dir is None)
    cybersense_cli::logging::init_file_logging(&context);

    // 3. Set panic hook (logs to file if available, always prints to stderr)
    std::panic::set_hook(Box::new(|info| {
        tracing::error!("{info}");
        eprintln!("{info}");
    }));

    // 4. Build runtime
    let db = DatabaseDriver::file(context.db_path());
    let runtime = Runtime { context, db };

    // 5. Run CLI
    let args: Vec<String> = std::env::args().collect();
    let args_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    let mut io = StdIO::new();

    let result = cybersense_cli::try_run(&args_refs, &runtime, &mut io);
    if let Err(ref e) = result {
        tracing::error!(error = format!("{e:?}"), "command failed");
    }
    result
}
