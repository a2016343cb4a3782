use anyhow::Result;
use clap::Parser;
use job_recommender::catalog_cli::{handle_catalog_command, CatalogCli};
use job_recommender::logging;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_tracing(None)?;
    let cli = CatalogCli::parse();
    handle_catalog_command(cli).await
}
