//! Aniko CLI entrypoint.
//!
//! Two subcommands:
//! - `aniko index <corpus.json> <catalog.json>` builds a catalog snapshot.
//! - `aniko recommend "<query>"` prints a markdown shortlist for a query.

use std::sync::Arc;

use aniko::catalog::{CatalogStore, builder};
use aniko::config::Config;
use aniko::embedding::{Embedder, EmbedderConfig};
use aniko::explain::{ExplanationModel, GenaiModel};
use aniko::pipeline::{PipelineConfig, RecommendationPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [command, corpus, snapshot] if command.as_str() == "index" => {
            let embedder = build_embedder(&config)?;
            let count = builder::build_snapshot(corpus, snapshot, &embedder)?;
            println!("Indexed {count} entries into {snapshot}");
            Ok(())
        }
        [command, query] if command.as_str() == "recommend" => run_recommend(&config, query).await,
        _ => {
            eprintln!("Usage:");
            eprintln!("  aniko index <corpus.json> <catalog.json>");
            eprintln!("  aniko recommend \"<query>\"");
            std::process::exit(2);
        }
    }
}

async fn run_recommend(config: &Config, query: &str) -> anyhow::Result<()> {
    // No catalog, no recommendations: load failure is fatal here.
    let store = Arc::new(CatalogStore::load(&config.catalog_path)?);
    let embedder = build_embedder(config)?;

    let model: Option<Arc<dyn ExplanationModel>> = match &config.generation_model {
        Some(name) => {
            tracing::info!(model = %name, "Using genai explanation model");
            Some(Arc::new(GenaiModel::new(name.clone())))
        }
        None => None,
    };

    let pipeline = RecommendationPipeline::with_config(
        store,
        embedder,
        model,
        PipelineConfig {
            top_k: config.top_k,
            top_n: config.top_n,
            generation_timeout: config.generation_timeout(),
        },
    );

    let markdown = pipeline.recommend(query).await?;
    println!("{markdown}");
    Ok(())
}

fn build_embedder(config: &Config) -> anyhow::Result<Embedder> {
    let embedder_config = match &config.model_path {
        Some(path) => {
            let mut embedder_config = EmbedderConfig::new(path.clone());
            if let Some(tokenizer) = &config.tokenizer_path {
                embedder_config = embedder_config.tokenizer_path(tokenizer.clone());
            }
            embedder_config
        }
        None => {
            tracing::warn!("No ANIKO_MODEL_PATH configured, running encoder in stub mode");
            EmbedderConfig::stub()
        }
    };

    Ok(Embedder::load(embedder_config)?)
}
