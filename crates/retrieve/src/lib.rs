pub mod context;
pub mod embedding;
pub mod structural;

pub use context::related_facts_text;
pub use embedding::{EmbeddingRetriever, cosine_similarity};
pub use structural::{SimilarArticle, StructuralRetriever};
