// Tests for VectorStore construction: embedding, validation, all-or-nothing

use async_trait::async_trait;
use docqa::{Chunk, Embedder, Embedding, HashEmbedder, PipelineError, VectorStore};

fn chunk(source: &str, seq: usize, text: &str) -> Chunk {
    Chunk {
        text: text.to_string(),
        source: source.to_string(),
        seq,
    }
}

/// Embedder that always fails, for all-or-nothing build tests
struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    fn dimension(&self) -> usize {
        8
    }

    async fn embed_documents(&self, _texts: &[String]) -> Result<Vec<Embedding>, PipelineError> {
        Err(PipelineError::Embedding {
            reason: "service down".to_string(),
        })
    }

    async fn embed_query(&self, _text: &str) -> Result<Embedding, PipelineError> {
        Err(PipelineError::Embedding {
            reason: "service down".to_string(),
        })
    }
}

/// Embedder that drops the last vector of every batch
struct ShortBatchEmbedder {
    inner: HashEmbedder,
}

#[async_trait]
impl Embedder for ShortBatchEmbedder {
    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Embedding>, PipelineError> {
        let mut embeddings = self.inner.embed_documents(texts).await?;
        embeddings.pop();
        Ok(embeddings)
    }

    async fn embed_query(&self, text: &str) -> Result<Embedding, PipelineError> {
        self.inner.embed_query(text).await
    }
}

#[tokio::test]
async fn test_build_embeds_every_chunk() {
    let embedder = HashEmbedder::new(48).unwrap();
    let chunks = vec![
        chunk("a.txt", 0, "first chunk"),
        chunk("a.txt", 1, "second chunk"),
        chunk("b.txt", 0, "third chunk"),
    ];

    let store = VectorStore::build(chunks, &embedder).await.unwrap();

    assert_eq!(store.len(), 3);
    assert!(!store.is_empty());
    assert_eq!(store.dimension(), 48);
}

#[test]
fn test_build_is_all_or_nothing() {
    let chunks = vec![chunk("a.txt", 0, "text")];
    let result = tokio_test::block_on(VectorStore::build(chunks, &FailingEmbedder));

    let err = result.unwrap_err();
    assert_eq!(err.error_code(), "EMBEDDING_FAILED");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_build_rejects_count_mismatch() {
    let embedder = ShortBatchEmbedder {
        inner: HashEmbedder::new(16).unwrap(),
    };
    let chunks = vec![chunk("a.txt", 0, "one"), chunk("a.txt", 1, "two")];

    let err = VectorStore::build(chunks, &embedder).await.unwrap_err();

    assert_eq!(err.error_code(), "EMBEDDING_FAILED");
    assert!(err.to_string().contains("1 vectors for 2 chunks"));
}

#[test]
fn test_from_embeddings_rejects_wrong_dimension() {
    let chunks = vec![chunk("doc.txt", 0, "ok"), chunk("doc.txt", 1, "bad")];
    let embeddings = vec![
        Embedding::new(vec![1.0, 0.0]),
        Embedding::new(vec![1.0, 0.0, 0.0]),
    ];

    let err = VectorStore::from_embeddings(chunks, embeddings, 2).unwrap_err();

    assert_eq!(err.error_code(), "DIMENSION_MISMATCH");
    // The offending chunk is named
    assert!(err.to_string().contains("doc.txt#1"));
}

#[test]
fn test_from_embeddings_rejects_non_finite_vectors() {
    let chunks = vec![chunk("doc.txt", 0, "nan")];
    let embeddings = vec![Embedding::new(vec![f32::NAN, 1.0])];

    let err = VectorStore::from_embeddings(chunks, embeddings, 2).unwrap_err();

    assert_eq!(err.error_code(), "EMBEDDING_FAILED");
}

#[tokio::test]
async fn test_same_corpus_builds_identical_indexes() {
    let embedder = HashEmbedder::new(32).unwrap();
    let chunks = vec![chunk("a.txt", 0, "alpha"), chunk("a.txt", 1, "beta")];

    let first = VectorStore::build(chunks.clone(), &embedder).await.unwrap();
    let second = VectorStore::build(chunks, &embedder).await.unwrap();

    let query = embedder.embed_query("alpha").await.unwrap();
    let hits_first = first.search(&query, 2).unwrap();
    let hits_second = second.search(&query, 2).unwrap();

    assert_eq!(hits_first.len(), hits_second.len());
    for (a, b) in hits_first.iter().zip(&hits_second) {
        assert_eq!(a.chunk.id(), b.chunk.id());
        assert_eq!(a.score, b.score);
    }
}
