// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Args;

use crate::cli::{build_pipeline, ConfigArgs};

/// Arguments for the ask command
#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question to answer
    pub question: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Build the index, then answer a single question
pub async fn run(args: AskArgs) -> Result<()> {
    let config = args.config.load()?;
    let data_dir = config.data_dir.clone();
    let pipeline = build_pipeline(config, args.config.offline)?;

    println!("🚀 Indexing documents from {}...", data_dir.display());
    let status = pipeline.build().await?;
    println!(
        "✅ Indexed {} documents into {} chunks",
        status.document_count, status.chunk_count
    );

    let answer = pipeline.query(&args.question).await?;

    println!("\n{}", answer.text);
    println!(
        "\nResponse time: {:.2} seconds",
        answer.synthesis_time_ms as f64 / 1000.0
    );
    Ok(())
}
