//! In-process vector index

use crate::models::Chunk;
use crate::retrieval::embedding::{cosine_similarity, Embedder, HashingEmbedder};
use crate::retrieval::{RetrievalBackend, RetrievalIndex};
use crate::Result;
use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

/// Stateless factory; every call to `new_index` starts empty.
#[derive(Clone)]
pub struct InMemoryBackend {
    embedder: Arc<dyn Embedder>,
}

impl InMemoryBackend {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new(Arc::new(HashingEmbedder::default()))
    }
}

impl RetrievalBackend for InMemoryBackend {
    fn new_index(&self) -> Box<dyn RetrievalIndex> {
        Box::new(InMemoryVectorIndex::new(self.embedder.clone()))
    }

    fn store_kind(&self) -> &'static str {
        "in-memory"
    }

    fn embedding_model(&self) -> String {
        self.embedder.model_id()
    }
}

pub struct InMemoryVectorIndex {
    embedder: Arc<dyn Embedder>,
    entries: Vec<(Chunk, Vec<f32>)>,
}

impl InMemoryVectorIndex {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl RetrievalIndex for InMemoryVectorIndex {
    async fn index(&mut self, chunks: &[Chunk]) -> Result<()> {
        self.entries = chunks
            .iter()
            .map(|chunk| (chunk.clone(), self.embedder.embed(&chunk.text)))
            .collect();

        debug!(chunk_count = self.entries.len(), "Chunks indexed");
        Ok(())
    }

    async fn query(&self, text: &str, k: usize) -> Result<Vec<Chunk>> {
        let query_vector = self.embedder.embed(text);

        let mut hits: Vec<(f64, &Chunk)> = self
            .entries
            .iter()
            .map(|(chunk, vector)| {
                let score = cosine_similarity(&query_vector, vector).unwrap_or(0.0);
                (score, chunk)
            })
            .collect();

        hits.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.id.cmp(&b.1.id))
        });
        hits.truncate(k);

        Ok(hits.into_iter().map(|(_, chunk)| chunk.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: usize, text: &str) -> Chunk {
        Chunk {
            id,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_query_ranks_most_relevant_first() {
        let backend = InMemoryBackend::default();
        let mut index = backend.new_index();

        index
            .index(&[
                chunk(0, "We sell coffee beans to cafes."),
                chunk(1, "The founding team has strong engineering experience."),
                chunk(2, "Regulatory risk remains a concern."),
            ])
            .await
            .unwrap();

        let hits = index.query("team experience", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, 1);
    }

    #[tokio::test]
    async fn test_k_larger_than_index_returns_everything() {
        let backend = InMemoryBackend::default();
        let mut index = backend.new_index();
        index.index(&[chunk(0, "alpha"), chunk(1, "beta")]).await.unwrap();

        let hits = index.query("gamma", 5).await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_ties_fall_back_to_chunk_order() {
        let backend = InMemoryBackend::default();
        let mut index = backend.new_index();
        index
            .index(&[chunk(0, "same words"), chunk(1, "same words")])
            .await
            .unwrap();

        let hits = index.query("same words", 2).await.unwrap();
        assert_eq!(hits[0].id, 0);
        assert_eq!(hits[1].id, 1);
    }

    #[tokio::test]
    async fn test_backend_hands_out_isolated_indexes() {
        let backend = InMemoryBackend::default();
        let mut first = backend.new_index();
        first.index(&[chunk(0, "first memo")]).await.unwrap();

        let second = backend.new_index();
        assert!(second.query("first memo", 5).await.unwrap().is_empty());
        assert_eq!(first.query("first memo", 5).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reindex_replaces_contents() {
        let mut index = InMemoryVectorIndex::new(Arc::new(HashingEmbedder::default()));
        index.index(&[chunk(0, "old"), chunk(1, "older")]).await.unwrap();
        index.index(&[chunk(0, "new")]).await.unwrap();
        assert_eq!(index.len(), 1);
    }
}
