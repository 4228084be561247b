// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Args;

use crate::cli::{build_pipeline, ConfigArgs};

/// Arguments for the index command
#[derive(Args, Debug)]
pub struct IndexArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Build the index and report its stats
pub async fn run(args: IndexArgs) -> Result<()> {
    let config = args.config.load()?;
    let data_dir = config.data_dir.clone();
    let pipeline = build_pipeline(config, args.config.offline)?;

    println!("🚀 Indexing documents from {}...", data_dir.display());
    let status = pipeline.build().await?;

    println!(
        "✅ Indexed {} documents into {} chunks ({}D vectors)",
        status.document_count, status.chunk_count, status.dimension
    );
    if let Some(ms) = status.last_build_ms {
        println!("   Build time: {:.2} seconds", ms as f64 / 1000.0);
    }
    Ok(())
}
