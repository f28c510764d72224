use std::path::Path;

use anyhow::Result;
use burnwatch_bot::bootstrap_helpers::{init_tracing, load_dotenv_file, log_dotenv_status};
use burnwatch_bot::{run, Cli};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv_path = Path::new(".env");
    let dotenv_loaded = load_dotenv_file(dotenv_path);
    let cli = Cli::parse();
    init_tracing();
    log_dotenv_status(dotenv_path, dotenv_loaded);
    run(cli).await
}
