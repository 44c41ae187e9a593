use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use config::Config;
use git::{Git, RepoProbe};
use metadata::BuildMetadata;
use types::AppError;

mod config;
mod emit;
mod git;
mod metadata;
mod types;
mod utils;
#[cfg(test)]
mod test_utils;

/// Short revision of this generator, or "unknown" outside a checkout.
const REVISION: &str = env!("NCL_BUILDINFO_REVISION");

async fn generate<P: RepoProbe>(config: &Config, probe: &P, now: DateTime<Utc>) -> Result<BuildMetadata, AppError> {
    let meta = BuildMetadata::collect(probe, config, now).await;
    emit::write_outputs(config, &meta).await?;
    Ok(meta)
}

fn summary(config: &Config) -> String {
    format!("{} and {} updated successfully!", config.header_file, config.json_file)
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout is reserved for the summary line
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::INFO)
        .init();
    log::info!("ncl_buildinfo revision {}", REVISION);

    let config = Config::default();
    let git = Git::from_config(&config);
    let meta = generate(&config, &git, Utc::now()).await.context("failed to generate build info")?;
    log::info!("{} {} ({}, {}, {})", meta.name, meta.version, meta.commit, meta.branch, meta.status);

    println!("{}", summary(&config));
    Ok(())
}
