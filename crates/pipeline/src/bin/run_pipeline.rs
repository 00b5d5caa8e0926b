use anyhow::{Context, Result};
use model::Article;
use pipeline::{
    AnalysisTask, DirectQuery, GraphConfig, Orchestrator, PipelineConfig, PipelineState,
    PipelineStatus,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let command = args.next().unwrap_or_else(|| "help".to_string());

    let config = config_from_env();

    match command.as_str() {
        "analyze" => {
            let path = args.next().context("usage: run_pipeline analyze <articles.json> [bias|fact-check]")?;
            let task = match args.next().as_deref() {
                Some("fact-check") => AnalysisTask::FactCheck,
                _ => AnalysisTask::Bias,
            };
            run_batch(&config, &path, task).await
        }
        "query-bias" => {
            let text = args.next().context("usage: run_pipeline query-bias <text>")?;
            run_query(&config, DirectQuery::Bias(text)).await
        }
        "query-fact" => {
            let claim = args.next().context("usage: run_pipeline query-fact <claim>")?;
            run_query(&config, DirectQuery::FactCheck(claim)).await
        }
        _ => {
            println!("=== News Verification Pipeline ===\n");
            println!("Commands:");
            println!("  analyze <articles.json> [bias|fact-check]   process a batch of articles");
            println!("  query-bias <text>                           classify a single text directly");
            println!("  query-fact <claim>                          fact-check a single claim directly");
            println!("\nEnvironment:");
            println!("  OLLAMA_URL, OLLAMA_MODEL, OLLAMA_EMBED_MODEL, OLLAMA_TIMEOUT_SECS");
            println!("  NEO4J_URI, NEO4J_USER, NEO4J_PASSWORD (all three to enable the graph)");
            Ok(())
        }
    }
}

/// Composition root: the one place the process environment is read.
fn config_from_env() -> PipelineConfig {
    let mut config = PipelineConfig::default();

    if let Ok(url) = std::env::var("OLLAMA_URL") {
        config.generation.base_url = url;
    }
    if let Ok(model) = std::env::var("OLLAMA_MODEL") {
        config.generation.model = model;
    }
    if let Ok(secs) = std::env::var("OLLAMA_TIMEOUT_SECS") {
        if let Ok(secs) = secs.parse() {
            config.generation.request_timeout_secs = secs;
        }
    }
    if let Ok(model) = std::env::var("OLLAMA_EMBED_MODEL") {
        config.embedding_model = Some(model);
    }

    if let (Ok(uri), Ok(user), Ok(password)) = (
        std::env::var("NEO4J_URI"),
        std::env::var("NEO4J_USER"),
        std::env::var("NEO4J_PASSWORD"),
    ) {
        config.graph = Some(GraphConfig { uri, user, password });
    }

    config
}

async fn run_batch(config: &PipelineConfig, path: &str, task: AnalysisTask) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("could not read article file {path}"))?;
    let articles: Vec<Article> =
        serde_json::from_str(&raw).context("article file is not a JSON array of articles")?;

    println!("=== News Verification Pipeline ===\n");
    println!("Articles: {}", articles.len());
    println!(
        "Graph: {}\n",
        if config.graph.is_some() { "enabled" } else { "disabled (text-only)" }
    );

    let orchestrator = Orchestrator::from_config(config).await?;
    let final_state = orchestrator.run(PipelineState::for_batch(articles, task)).await;

    print_batch_results(&final_state);

    let results_json = serde_json::to_string_pretty(&final_state)?;
    std::fs::write("pipeline_results.json", results_json)?;
    println!("\nResults saved to pipeline_results.json");

    Ok(())
}

async fn run_query(config: &PipelineConfig, query: DirectQuery) -> Result<()> {
    let orchestrator = Orchestrator::from_config(config).await?;
    let final_state = orchestrator.run(PipelineState::for_query(query)).await;

    if let Some(assessment) = &final_state.last_bias {
        println!("Bias:       {}", assessment.category);
        println!("Confidence: {}", assessment.confidence);
        println!("Reasoning:  {}", assessment.reasoning);
    }
    if let Some(record) = &final_state.last_fact_check {
        println!("Verdict:    {}", record.verdict);
        println!("Confidence: {}", record.confidence);
        println!("Reasoning:  {}", record.reasoning);
    }

    Ok(())
}

fn print_batch_results(state: &PipelineState) {
    println!("=== RESULTS ===\n");

    for item in &state.items {
        println!("{}", item.article.url);
        if let Some(assessment) = &item.article.bias_assessment {
            println!("  bias: {} ({}%)", assessment.category, assessment.confidence);
        }
        if let Some(record) = &item.article.fact_check {
            println!("  verdict: {} ({}%)", record.verdict, record.confidence);
        }
        if let Some(error) = &item.error {
            println!("  degraded: {error}");
        }
    }

    let failed = state.failed_items();
    println!("\nProcessed: {} articles, {} degraded", state.items.len(), failed);
    if state.status == PipelineStatus::PartiallyFailed {
        println!("Status: partially failed");
    } else {
        println!("Status: completed");
    }
}
