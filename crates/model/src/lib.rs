pub mod article;
pub mod error;
pub mod labels;
pub mod verdict;

pub use article::{Article, EntityRef};
pub use error::{PipelineError, Result};
pub use labels::{BiasCategory, FactVerdict};
pub use verdict::{BiasAssessment, FactCheckRecord};
