pub mod chat;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod providers;
pub mod repl;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::info;

use config::Config;
use repl::run_repl;

pub async fn run() -> Result<()> {
    // Merge a local .env into the process environment before anything reads
    // it. Values already present in the environment win.
    dotenvy::dotenv().ok();
    logging::init();

    let cfg = Config::from_env();
    info!(
        model = %cfg.model,
        api_base_url = %cfg.api_base_url,
        "loaded runtime configuration"
    );

    let client = Client::builder()
        .build()
        .context("Failed to initialize HTTP client")?;

    run_repl(&client, &cfg).await
}
