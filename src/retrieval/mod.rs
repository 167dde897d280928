//! Retrieval capability
//!
//! Nearest-neighbor lookup over the chunks of one memo. A backend hands out
//! a fresh index per analysis call; indexes are never shared between calls.

use crate::models::Chunk;
use crate::Result;
use async_trait::async_trait;

pub mod embedding;
pub mod memory;

pub use embedding::{Embedder, HashingEmbedder};
pub use memory::{InMemoryBackend, InMemoryVectorIndex};

/// A per-invocation chunk index
#[async_trait]
pub trait RetrievalIndex: Send + Sync {
    /// Replace the index contents with `chunks`.
    async fn index(&mut self, chunks: &[Chunk]) -> Result<()>;

    /// Top `k` chunks for `text`, most relevant first.
    async fn query(&self, text: &str, k: usize) -> Result<Vec<Chunk>>;
}

/// Factory for isolated indexes plus the static facts reported in status
pub trait RetrievalBackend: Send + Sync {
    fn new_index(&self) -> Box<dyn RetrievalIndex>;

    fn store_kind(&self) -> &'static str;

    fn embedding_model(&self) -> String;
}
