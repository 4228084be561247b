pub mod ask;
pub mod chat;
pub mod index;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::config::PipelineConfig;
use crate::embeddings::{Embedder, HashEmbedder};
use crate::pipeline::Pipeline;
use crate::synthesis::ChatSynthesizer;

/// Document question answering CLI
#[derive(Parser, Debug)]
#[command(name = "docqa")]
#[command(version = "0.1.0")]
#[command(about = "Index documents and answer questions grounded in them", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the vector index from the data directory
    Index(index::IndexArgs),

    /// Build the index, then answer a single question
    Ask(ask::AskArgs),

    /// Interactive question loop with /rebuild, /status and /quit
    Chat(chat::ChatArgs),
}

/// Configuration flags shared by every subcommand
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Path to a TOML config file
    #[arg(long)]
    pub config: Option<String>,

    /// Directory holding the documents to index
    #[arg(long, env = "DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Chunk window size in bytes
    #[arg(long, env = "CHUNK_SIZE")]
    pub chunk_size: Option<usize>,

    /// Overlap carried between consecutive chunks in bytes
    #[arg(long, env = "CHUNK_OVERLAP")]
    pub chunk_overlap: Option<usize>,

    /// Number of chunks retrieved per question
    #[arg(long, env = "TOP_K")]
    pub top_k: Option<usize>,

    /// Use deterministic offline embeddings instead of the HTTP embedder
    #[arg(long)]
    pub offline: bool,
}

impl ConfigArgs {
    /// Resolve the effective configuration: file, then env, then flags
    pub fn load(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let mut c = PipelineConfig::from_file(path)?;
                c.apply_env();
                c
            }
            None => PipelineConfig::from_env(),
        };

        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(size) = self.chunk_size {
            config.chunk_size = size;
        }
        if let Some(overlap) = self.chunk_overlap {
            config.chunk_overlap = overlap;
        }
        if let Some(k) = self.top_k {
            config.top_k = k;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Wire a pipeline from the resolved configuration
pub(crate) fn build_pipeline(config: PipelineConfig, offline: bool) -> Result<Pipeline> {
    let pipeline = if offline {
        let embedder: Arc<dyn Embedder> =
            Arc::new(HashEmbedder::new(config.embedding.dimension)?);
        let synthesizer = Arc::new(ChatSynthesizer::new(&config.synthesis)?);
        Pipeline::new(config, embedder, synthesizer)?
    } else {
        Pipeline::from_config(config)?
    };
    Ok(pipeline)
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Index(args) => index::run(args).await,
        Commands::Ask(args) => ask::run(args).await,
        Commands::Chat(args) => chat::run(args).await,
    }
}
