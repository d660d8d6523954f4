//! Generate command - write a random map configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hexmap_core::MapConfig;

use crate::common::create_rng;

#[derive(Args)]
pub struct GenerateArgs {
    /// Map radius
    #[arg(long, default_value = "8")]
    pub radius: u32,

    /// Percentage of cells made impassable
    #[arg(long, default_value = "15", value_parser = clap::value_parser!(u32).range(0..=100))]
    pub blocked: u32,

    /// Map name
    #[arg(long, default_value = "random")]
    pub name: String,

    /// Output JSON file
    #[arg(long, value_name = "FILE")]
    pub output: PathBuf,
}

pub fn run(args: GenerateArgs, seed: Option<u64>) -> Result<()> {
    let mut rng = create_rng(seed);
    let config = MapConfig::random(&mut rng, &args.name, args.radius, args.blocked);

    // Fail here rather than at load time if the map is inconsistent
    config.build().context("Generated map is invalid")?;

    config
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    tracing::info!(
        "Saved map '{}' to {} ({} terrain patches, {} impassable)",
        config.name,
        args.output.display(),
        config.terrain.len(),
        config.impassable.len()
    );

    Ok(())
}
