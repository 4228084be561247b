// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::io::Write;

use anyhow::Result;
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::{build_pipeline, ConfigArgs};
use crate::pipeline::Pipeline;

/// Arguments for the chat command
#[derive(Args, Debug)]
pub struct ChatArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Interactive question loop over the indexed documents
///
/// The session starts without an index; /rebuild triggers indexing, so the
/// cost of embedding is always an explicit user action.
pub async fn run(args: ChatArgs) -> Result<()> {
    let config = args.config.load()?;
    let data_dir = config.data_dir.clone();
    let pipeline = build_pipeline(config, args.config.offline)?;

    println!("🚀 docqa chat. Ask a question, or use /rebuild, /status, /quit.");
    println!(
        "   No index yet. Type /rebuild to index {}.",
        data_dir.display()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "/quit" => break,
            "/rebuild" => rebuild(&pipeline).await,
            "/status" => {
                let status = pipeline.status().await;
                println!("{}", serde_json::to_string_pretty(&status)?);
            }
            _ if input.starts_with('/') => {
                println!("Unknown command {}. Available: /rebuild, /status, /quit", input);
            }
            question => answer(&pipeline, question).await,
        }
    }

    println!("👋 Bye");
    Ok(())
}

async fn rebuild(pipeline: &Pipeline) {
    println!("🚀 Indexing...");
    match pipeline.build().await {
        Ok(status) => println!(
            "✅ Indexed {} documents into {} chunks",
            status.document_count, status.chunk_count
        ),
        Err(e) => println!("❌ {}", e.user_message()),
    }
}

async fn answer(pipeline: &Pipeline, question: &str) {
    match pipeline.query(question).await {
        Ok(answer) => {
            println!("\n{}\n", answer.text);
            println!(
                "Response time: {:.2} seconds",
                answer.synthesis_time_ms as f64 / 1000.0
            );
        }
        Err(e) => println!("❌ {}", e.user_message()),
    }
}
