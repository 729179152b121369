//! ragline CLI entry point.

use anyhow::Result;
use clap::Parser;

use ragline::cli::{commands, handle_error, AppContext, Cli, Commands};
use ragline::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = run(cli).await {
        handle_error(&err, json);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = AppContext::load_config(cli.config.as_deref())?;
    // logging is up before the provider is built
    let _logger = LoggerImpl::init(&config.logging)?;
    let ctx = AppContext::from_config(config)?;

    match cli.command {
        Commands::Ingest {
            files,
            chunk_size,
            overlap,
        } => commands::ingest::execute(&ctx, files, chunk_size, overlap, cli.json).await,
        Commands::Query {
            question,
            top_k,
            filters,
            prompt,
        } => commands::query::execute(&ctx, question, top_k, &filters, prompt, cli.json).await,
        Commands::Stats => commands::stats::execute(&ctx, cli.json).await,
        Commands::Config => commands::config::execute(&ctx.config, cli.json),
    }
}
