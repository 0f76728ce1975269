use anyhow::Context;
use clap::Parser;

use netflix_eda::config::WebConfig;
use netflix_eda::data::loader::load_file;
use netflix_eda::web;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = WebConfig::parse();

    let dataset = load_file(&config.data.path)
        .inspect_err(|e| log::error!("Failed to load {}: {e}", config.data.path.display()))
        .with_context(|| format!("Failed to load {}", config.data.path.display()))?;

    web::run(dataset, config.bind).await
}
