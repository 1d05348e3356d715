//! # schemaguard CLI Entry Point

use clap::Parser;
use std::sync::Arc;

use schemaguard::cli::{Cli, Commands};
use schemaguard::observability::init_tracing;
use schemaguard::output::LockedWriter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match cli.command {
        Commands::Validate(args) => {
            let config = args.into_config(cli.log_format);
            let sink = Arc::new(LockedWriter::stdout());
            schemaguard::cli::run_validate(&config, sink).await?;
        }
    }

    Ok(())
}
