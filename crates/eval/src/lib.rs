pub mod benchmark;
pub mod metrics;
pub mod test_set;

pub use benchmark::{Benchmarker, BenchmarkResults, Comparison, MethodResults, prediction_pairs};
pub use metrics::{ConfusionMatrix, EvaluationReport, LabelMetrics};
pub use test_set::get_test_set;
