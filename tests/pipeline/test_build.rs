// Tests for index builds: ingestion, rebuild retention, serialization, timeout

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use docqa::{
    Answer, Document, Embedder, Embedding, HashEmbedder, IndexState, Pipeline, PipelineConfig,
    PipelineError, ScoredChunk, Synthesizer,
};

struct CannedSynthesizer;

#[async_trait]
impl Synthesizer for CannedSynthesizer {
    async fn synthesize(
        &self,
        _question: &str,
        context: &[ScoredChunk],
    ) -> Result<Answer, PipelineError> {
        Ok(Answer {
            text: format!("answer from {} chunks", context.len()),
            synthesis_time_ms: 5,
        })
    }
}

/// Hash embedder with an added delay, to observe in-progress builds
struct SlowEmbedder {
    inner: HashEmbedder,
    delay: Duration,
}

impl SlowEmbedder {
    fn new(dimension: usize, delay: Duration) -> Self {
        Self {
            inner: HashEmbedder::new(dimension).unwrap(),
            delay,
        }
    }
}

#[async_trait]
impl Embedder for SlowEmbedder {
    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Embedding>, PipelineError> {
        tokio::time::sleep(self.delay).await;
        self.inner.embed_documents(texts).await
    }

    async fn embed_query(&self, text: &str) -> Result<Embedding, PipelineError> {
        self.inner.embed_query(text).await
    }
}

/// Embedder that always fails, for build failure paths
struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    fn dimension(&self) -> usize {
        32
    }

    async fn embed_documents(&self, _texts: &[String]) -> Result<Vec<Embedding>, PipelineError> {
        Err(PipelineError::Embedding {
            reason: "connection refused".to_string(),
        })
    }

    async fn embed_query(&self, _text: &str) -> Result<Embedding, PipelineError> {
        Err(PipelineError::Embedding {
            reason: "connection refused".to_string(),
        })
    }
}

fn test_config(data_dir: PathBuf) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.data_dir = data_dir;
    config.chunk_size = 80;
    config.chunk_overlap = 10;
    config.top_k = 2;
    config.embedding.dimension = 32;
    config
}

fn docs() -> Vec<Document> {
    vec![
        Document::new("a.txt", "docqa answers questions"),
        Document::new("b.txt", "indexes are built from documents"),
    ]
}

#[tokio::test]
async fn test_build_loads_from_data_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("guide.txt"), "how to use the product").unwrap();
    std::fs::write(dir.path().join("notes.md"), "some release notes").unwrap();
    std::fs::write(dir.path().join("script.py"), "print('ignored')").unwrap();

    let config = test_config(dir.path().to_path_buf());
    let embedder = Arc::new(HashEmbedder::new(32).unwrap());
    let pipeline = Pipeline::new(config, embedder, Arc::new(CannedSynthesizer)).unwrap();

    let status = pipeline.build().await.unwrap();

    assert_eq!(status.document_count, 2);
    assert_eq!(status.chunk_count, 2);
    assert_eq!(pipeline.state().await, IndexState::Ready);
}

#[tokio::test]
async fn test_empty_document_set_rejected() {
    let config = test_config(PathBuf::from("data"));
    let embedder = Arc::new(HashEmbedder::new(32).unwrap());
    let pipeline = Pipeline::new(config, embedder, Arc::new(CannedSynthesizer)).unwrap();

    let err = pipeline.build_documents(Vec::new()).await.unwrap_err();

    assert_eq!(err.error_code(), "DOCUMENT_LOAD_FAILED");
    assert_eq!(pipeline.state().await, IndexState::Failed);
}

#[tokio::test]
async fn test_embedding_failure_fails_the_build() {
    let config = test_config(PathBuf::from("data"));
    let pipeline =
        Pipeline::new(config, Arc::new(FailingEmbedder), Arc::new(CannedSynthesizer)).unwrap();

    let err = pipeline.build_documents(docs()).await.unwrap_err();

    assert_eq!(err.error_code(), "EMBEDDING_FAILED");
    assert!(err.user_message().contains("Embedding service unavailable"));
    assert_eq!(pipeline.state().await, IndexState::Failed);

    let status = pipeline.status().await;
    assert!(status.last_error.unwrap().contains("connection refused"));
}

#[tokio::test]
async fn test_rebuild_failure_retains_last_good_index() {
    // data_dir does not exist, so build() fails; build_documents() succeeds
    let config = test_config(PathBuf::from("/nonexistent/docqa-test-data"));
    let embedder = Arc::new(HashEmbedder::new(32).unwrap());
    let pipeline = Pipeline::new(config, embedder, Arc::new(CannedSynthesizer)).unwrap();

    let good = pipeline.build_documents(docs()).await.unwrap();
    assert_eq!(pipeline.state().await, IndexState::Ready);

    let err = pipeline.build().await.unwrap_err();
    assert_eq!(err.error_code(), "DOCUMENT_LOAD_FAILED");

    // The failure is recorded, but the previous index keeps serving
    assert_eq!(pipeline.state().await, IndexState::Ready);
    let status = pipeline.status().await;
    assert_eq!(status.state, "ready");
    assert!(status.last_error.is_some());
    assert_eq!(status.chunk_count, 2);
    assert_eq!(status.build_id, good.build_id);

    let answer = pipeline.query("docqa answers questions").await.unwrap();
    assert!(answer.text.contains("2 chunks"));
}

#[tokio::test]
async fn test_query_during_build_rejected_as_building() {
    let config = test_config(PathBuf::from("data"));
    let embedder = Arc::new(SlowEmbedder::new(32, Duration::from_millis(400)));
    let pipeline =
        Arc::new(Pipeline::new(config, embedder, Arc::new(CannedSynthesizer)).unwrap());

    let builder = Arc::clone(&pipeline);
    let handle = tokio::spawn(async move { builder.build_documents(docs()).await });

    // Let the build reach its embedding call
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(pipeline.state().await, IndexState::Building);

    let err = pipeline.query("too early").await.unwrap_err();
    assert_eq!(err.error_code(), "INDEX_NOT_READY");
    assert_eq!(
        err.user_message(),
        "Indexing is still in progress. Try again once it finishes."
    );

    handle.await.unwrap().unwrap();
    assert_eq!(pipeline.state().await, IndexState::Ready);
    pipeline.query("now it works").await.unwrap();
}

#[tokio::test]
async fn test_concurrent_builds_serialize() {
    let config = test_config(PathBuf::from("data"));
    let embedder = Arc::new(SlowEmbedder::new(32, Duration::from_millis(150)));
    let pipeline =
        Arc::new(Pipeline::new(config, embedder, Arc::new(CannedSynthesizer)).unwrap());

    let first = Arc::clone(&pipeline);
    let second = Arc::clone(&pipeline);
    let (a, b) = tokio::join!(
        tokio::spawn(async move { first.build_documents(docs()).await }),
        tokio::spawn(async move { second.build_documents(docs()).await }),
    );

    let a = a.unwrap().unwrap();
    let b = b.unwrap().unwrap();

    // Both builds ran to completion, one after the other
    assert_ne!(a.build_id, b.build_id);
    assert_eq!(pipeline.state().await, IndexState::Ready);
    assert_eq!(pipeline.status().await.chunk_count, 2);
}

#[tokio::test]
async fn test_embedding_timeout_fails_the_build() {
    let mut config = test_config(PathBuf::from("data"));
    config.embedding.timeout_secs = 1;

    let embedder = Arc::new(SlowEmbedder::new(32, Duration::from_secs(3)));
    let pipeline = Pipeline::new(config, embedder, Arc::new(CannedSynthesizer)).unwrap();

    let err = pipeline.build_documents(docs()).await.unwrap_err();

    assert_eq!(err.error_code(), "TIMEOUT");
    assert!(err.is_retryable());
    assert!(err.to_string().contains("embedding"));
    assert_eq!(pipeline.state().await, IndexState::Failed);
}
