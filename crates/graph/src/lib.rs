pub mod embeddings;
pub mod memory;
pub mod neo4j;
pub mod store;

pub use embeddings::EmbeddingClient;
pub use memory::MemoryStore;
pub use neo4j::Neo4jStore;
pub use store::{
    EmbeddingCandidate, FactTriple, GraphStats, GraphStore, MentionOverlap,
};
