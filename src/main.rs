//! Pagesmith - file-based route compiler CLI.

use anyhow::Result;
use clap::Parser;
use pagesmith::{RouteCompiler, RouterConfig, cli::Cli, log, watch::watch_for_changes};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = RouterConfig::load(&cli)?;
    let output = config.output_dir();

    let compiler = Arc::new(RouteCompiler::new(config));
    let table = Arc::clone(&compiler).compile_async().await?.unwrap_or_else(|| compiler.table());
    table.write_to(&output)?;
    log!("routes"; "wrote {} routes to {}", table.routes.len(), output.display());

    if cli.is_watch() {
        watch_for_changes(compiler, &cli).await?;
    }
    Ok(())
}
