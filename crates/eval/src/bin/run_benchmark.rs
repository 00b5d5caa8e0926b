use anyhow::{Context, Result};
use eval::{get_test_set, Benchmarker, BenchmarkResults, MethodResults};
use pipeline::{GraphConfig, Orchestrator, PipelineConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== Bias Classification Benchmark ===\n");

    let mut config = PipelineConfig::default();
    if let Ok(url) = std::env::var("OLLAMA_URL") {
        config.generation.base_url = url;
    }
    if let Ok(model) = std::env::var("OLLAMA_MODEL") {
        config.generation.model = model;
    }
    config.graph = Some(GraphConfig {
        uri: std::env::var("NEO4J_URI").unwrap_or_else(|_| "bolt://localhost:7687".to_string()),
        user: std::env::var("NEO4J_USER").unwrap_or_else(|_| "neo4j".to_string()),
        password: std::env::var("NEO4J_PASSWORD").context("NEO4J_PASSWORD is required")?,
    });

    let graph_assisted = Orchestrator::from_config(&config).await?;

    let mut baseline_config = config.clone();
    baseline_config.graph = None;
    let text_only = Orchestrator::from_config(&baseline_config).await?;

    let test_set = get_test_set();
    println!("Test set: {} labeled articles\n", test_set.len());

    let benchmarker = Benchmarker::new(graph_assisted, text_only);
    let results = benchmarker.run(&test_set).await?;

    print_results(&results);

    let results_json = serde_json::to_string_pretty(&results)?;
    std::fs::write("benchmark_results.json", results_json)?;
    println!("\nResults saved to benchmark_results.json");

    Ok(())
}

fn print_results(results: &BenchmarkResults) {
    println!("\n=== RESULTS ===\n");

    println!("TEXT-ONLY BASELINE:");
    print_method_results(&results.text_only);

    println!("\nGRAPH-ASSISTED:");
    print_method_results(&results.graph_assisted);

    println!("\nCOMPARISON (graph-assisted minus text-only):");
    println!("  Accuracy: {:+.3}", results.comparison.accuracy_delta);
    println!("  Macro F1: {:+.3}", results.comparison.macro_f1_delta);
    println!("  Kappa:    {:+.3}", results.comparison.kappa_delta);
}

fn print_method_results(results: &MethodResults) {
    println!("  Articles:    {}", results.total_articles);
    println!("  Degraded:    {}", results.degraded_articles);
    println!("  Avg Latency: {:.0} ms", results.avg_latency_ms);
    println!("  Accuracy:    {:.3}", results.report.accuracy);
    println!("  Macro F1:    {:.3}", results.report.macro_f1);
    println!("  Weighted F1: {:.3}", results.report.weighted_f1);
    println!("  Kappa:       {:.3}", results.report.cohen_kappa);
    println!("  MCC:         {:.3}", results.report.matthews_corrcoef);
    for label in &results.report.per_label {
        println!(
            "    {:8} precision {:.3}  recall {:.3}  f1 {:.3}  (n={})",
            label.label, label.precision, label.recall, label.f1, label.support
        );
    }
}
