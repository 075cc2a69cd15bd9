use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

mod args;
mod cmd;
mod io;
mod output;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = args::Cli::parse();
    output::init(cli.json);
    output::init_tracing(cli.json);

    cmd::dispatch(cli).await
}
