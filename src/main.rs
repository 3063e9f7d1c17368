use anyhow::Result;
use clap::Parser;
use handle_check::{
    cli::{commands, flags::Cli},
    core::logger::init_tracing,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_file.as_deref())?;
    commands::run(cli).await
}
