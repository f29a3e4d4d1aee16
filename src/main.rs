use anyhow::{Context, Result};
use clap::Parser;
use reqwest::Client;
use tracing::warn;

use mapillary_geotag::args::ProgramArgs;
use mapillary_geotag::config::Config;
use mapillary_geotag::constants::USER_AGENT;
use mapillary_geotag::run;
use mapillary_geotag::utils::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = ProgramArgs::parse();
    let cfg = Config::from_env()?.with_overrides(args.size, args.output_dir.clone());

    let http = Client::builder()
        .timeout(cfg.request_timeout)
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build reqwest client")?;

    run(
        &http,
        &cfg,
        &args.bounding_box(),
        args.max_results,
        interrupt_signal(),
    )
    .await?;
    Ok(())
}

async fn interrupt_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {error}");
        std::future::pending::<()>().await;
    }
}
