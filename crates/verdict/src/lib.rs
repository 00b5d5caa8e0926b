pub mod bias;
pub mod fact;
pub mod parse;
pub mod prompts;

pub use bias::BiasAgent;
pub use fact::FactCheckAgent;
pub use parse::{largest_json_block, parse_verdict};
pub use prompts::NO_SIMILAR_CONTEXT;
