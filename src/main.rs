// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::env;

use clap::Parser;

use docqa::cli::{self, Cli};
use docqa::PipelineError;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if let Err(e) = cli::execute(cli).await {
        let message = e
            .downcast_ref::<PipelineError>()
            .map(|pe| pe.user_message())
            .unwrap_or_else(|| e.to_string());
        eprintln!("❌ {}", message);
        std::process::exit(1);
    }
}
