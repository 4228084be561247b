// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Pipeline orchestrator: index builds, queries, and the state machine
//!
//! The pipeline owns one mutable cell holding {state, index reference, last
//! error}. Builds are serialized by a build lock and commit by swapping the
//! index reference; queries only read. A rebuild that fails keeps the
//! previous index and the pipeline stays answerable.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::time::timeout;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::chunker::TextChunker;
use crate::config::PipelineConfig;
use crate::documents::{self, Document};
use crate::embeddings::{Embedder, HttpEmbedder};
use crate::errors::PipelineError;
use crate::retriever::Retriever;
use crate::synthesis::{Answer, ChatSynthesizer, Synthesizer};
use crate::vector::VectorStore;

/// Lifecycle of the index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    /// No build attempted yet
    Empty,
    /// A build is in progress; queries are rejected until it commits
    Building,
    /// An index is available and queries are served
    Ready,
    /// The last build failed and no usable index exists
    Failed,
}

impl IndexState {
    pub fn name(&self) -> &'static str {
        match self {
            IndexState::Empty => "empty",
            IndexState::Building => "building",
            IndexState::Ready => "ready",
            IndexState::Failed => "failed",
        }
    }
}

/// Serializable snapshot of the pipeline, used by the CLI status surface
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStatus {
    pub state: String,
    pub document_count: usize,
    pub chunk_count: usize,
    pub dimension: usize,
    pub build_id: Option<Uuid>,
    pub built_at: Option<DateTime<Utc>>,
    pub last_build_ms: Option<u64>,
    pub last_error: Option<String>,
}

/// Metadata recorded for the last successful build
#[derive(Debug, Clone)]
struct BuildInfo {
    id: Uuid,
    document_count: usize,
    built_at: DateTime<Utc>,
    build_ms: u64,
}

struct StateCell {
    state: IndexState,
    store: Option<Arc<VectorStore>>,
    last_error: Option<String>,
    build_info: Option<BuildInfo>,
}

/// Document question-answering pipeline
///
/// Explicit and injectable: the embedder and synthesizer arrive as trait
/// objects, nothing lives in globals.
pub struct Pipeline {
    config: PipelineConfig,
    embedder: Arc<dyn Embedder>,
    synthesizer: Arc<dyn Synthesizer>,
    retriever: Retriever,
    cell: RwLock<StateCell>,
    build_lock: Mutex<()>,
}

impl Pipeline {
    /// Create a pipeline with injected embedding and synthesis providers
    pub fn new(
        config: PipelineConfig,
        embedder: Arc<dyn Embedder>,
        synthesizer: Arc<dyn Synthesizer>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        let retriever = Retriever::new(Arc::clone(&embedder), config.top_k);
        Ok(Self {
            config,
            embedder,
            synthesizer,
            retriever,
            cell: RwLock::new(StateCell {
                state: IndexState::Empty,
                store: None,
                last_error: None,
                build_info: None,
            }),
            build_lock: Mutex::new(()),
        })
    }

    /// Create a pipeline wired to the configured HTTP providers
    pub fn from_config(config: PipelineConfig) -> Result<Self, PipelineError> {
        let embedder: Arc<dyn Embedder> = Arc::new(HttpEmbedder::new(&config.embedding)?);
        let synthesizer: Arc<dyn Synthesizer> = Arc::new(ChatSynthesizer::new(&config.synthesis)?);
        Self::new(config, embedder, synthesizer)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load documents from the configured data directory and build the index
    pub async fn build(&self) -> Result<PipelineStatus, PipelineError> {
        self.run_build(None).await
    }

    /// Build the index over caller-supplied documents
    pub async fn build_documents(
        &self,
        documents: Vec<Document>,
    ) -> Result<PipelineStatus, PipelineError> {
        self.run_build(Some(documents)).await
    }

    async fn run_build(
        &self,
        documents: Option<Vec<Document>>,
    ) -> Result<PipelineStatus, PipelineError> {
        // One build at a time; a second caller waits, then runs as a rebuild.
        let _guard = self.build_lock.lock().await;

        {
            let mut cell = self.cell.write().await;
            cell.state = IndexState::Building;
        }
        let started = Instant::now();

        // The cell lock is NOT held across embedding, so concurrent queries
        // fail fast with a building state instead of blocking.
        let outcome = self.index_documents(documents).await;

        let mut cell = self.cell.write().await;
        match outcome {
            Ok((document_count, store)) => {
                let info = BuildInfo {
                    id: Uuid::new_v4(),
                    document_count,
                    built_at: Utc::now(),
                    build_ms: started.elapsed().as_millis() as u64,
                };
                info!(
                    build_id = %info.id,
                    documents = info.document_count,
                    chunks = store.len(),
                    ms = info.build_ms,
                    "Index build complete"
                );
                cell.store = Some(Arc::new(store));
                cell.build_info = Some(info);
                cell.last_error = None;
                cell.state = IndexState::Ready;
                Ok(self.snapshot(&cell))
            }
            Err(e) => {
                cell.last_error = Some(e.to_string());
                if cell.store.is_some() {
                    warn!("Index rebuild failed, keeping previous index: {}", e);
                    cell.state = IndexState::Ready;
                } else {
                    error!("Index build failed: {}", e);
                    cell.state = IndexState::Failed;
                }
                Err(e)
            }
        }
    }

    async fn index_documents(
        &self,
        documents: Option<Vec<Document>>,
    ) -> Result<(usize, VectorStore), PipelineError> {
        let documents = match documents {
            Some(docs) => docs,
            None => documents::load_documents(&self.config.data_dir)?,
        };
        if documents.is_empty() {
            return Err(PipelineError::DocumentLoad {
                path: self.config.data_dir.display().to_string(),
                reason: "no documents to index".to_string(),
            });
        }

        let chunker = TextChunker::new(self.config.chunk_size, self.config.chunk_overlap)?;
        let chunks = chunker.split_documents(&documents);
        info!(
            "Chunked {} documents into {} chunks",
            documents.len(),
            chunks.len()
        );

        let secs = self.config.embedding.timeout_secs;
        let store = timeout(
            Duration::from_secs(secs),
            VectorStore::build(chunks, self.embedder.as_ref()),
        )
        .await
        .map_err(|_| PipelineError::Timeout {
            stage: "embedding",
            seconds: secs,
        })??;

        Ok((documents.len(), store))
    }

    /// Answer a question from the indexed documents
    ///
    /// Valid only while an index is ready. Query failures never change the
    /// index state; the index stays usable for the next question.
    pub async fn query(&self, question: &str) -> Result<Answer, PipelineError> {
        if question.trim().is_empty() {
            return Err(PipelineError::Config(
                "question must not be empty".to_string(),
            ));
        }

        let store = {
            let cell = self.cell.read().await;
            if cell.state != IndexState::Ready {
                return Err(PipelineError::IndexNotReady {
                    state: cell.state.name(),
                });
            }
            // Ready always carries a store
            cell.store.clone().ok_or(PipelineError::IndexNotReady {
                state: "empty",
            })?
        };

        let embed_secs = self.config.embedding.timeout_secs;
        let hits = timeout(
            Duration::from_secs(embed_secs),
            self.retriever.retrieve(question, &store),
        )
        .await
        .map_err(|_| PipelineError::Timeout {
            stage: "embedding",
            seconds: embed_secs,
        })??;

        let synth_secs = self.config.synthesis.timeout_secs;
        let answer = timeout(
            Duration::from_secs(synth_secs),
            self.synthesizer.synthesize(question, &hits),
        )
        .await
        .map_err(|_| PipelineError::Timeout {
            stage: "synthesis",
            seconds: synth_secs,
        })??;

        info!(
            "Question answered in {} ms ({} context chunks)",
            answer.synthesis_time_ms,
            hits.len()
        );
        Ok(answer)
    }

    /// Current pipeline state
    pub async fn state(&self) -> IndexState {
        self.cell.read().await.state
    }

    /// Snapshot of the pipeline for status reporting
    pub async fn status(&self) -> PipelineStatus {
        let cell = self.cell.read().await;
        self.snapshot(&cell)
    }

    fn snapshot(&self, cell: &StateCell) -> PipelineStatus {
        PipelineStatus {
            state: cell.state.name().to_string(),
            document_count: cell
                .build_info
                .as_ref()
                .map(|b| b.document_count)
                .unwrap_or(0),
            chunk_count: cell.store.as_ref().map(|s| s.len()).unwrap_or(0),
            dimension: self.embedder.dimension(),
            build_id: cell.build_info.as_ref().map(|b| b.id),
            built_at: cell.build_info.as_ref().map(|b| b.built_at),
            last_build_ms: cell.build_info.as_ref().map(|b| b.build_ms),
            last_error: cell.last_error.clone(),
        }
    }
}
