//! CLI entry point for lexplain.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use lexplain_ai::Embedder;
use lexplain_core::DocumentRecord;
use lexplain_model::HttpModelClient;
use lexplain_pipeline::{Pipeline, PlainTextExtractor, TextExtractor};
use lexplain_store::{DocumentStore, JsonFileStore};

#[derive(Parser)]
#[command(name = "lexplain", version, about = "Legal document simplification and clause grounding")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Simplify a document, ground its clauses, and persist the result.
    Process {
        /// Plain-text document to process.
        file: PathBuf,

        /// Kind of document (contract, lease, terms-of-service, ...).
        #[arg(long, default_value = "contract")]
        document_type: String,

        /// Directory containing model.onnx and tokenizer.json.
        #[arg(long, default_value = "models/all-MiniLM-L6-v2")]
        model_dir: PathBuf,

        /// Directory for persisted document records.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// API key for the generative model endpoint.
        #[arg(long, env = "GEMINI_API_KEY")]
        api_key: String,

        /// Override the generative model name.
        #[arg(long)]
        model: Option<String>,
    },

    /// Ask a follow-up question about a processed document.
    Ask {
        /// Identifier returned by `process`.
        id: u64,

        #[arg(long)]
        question: String,

        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        #[arg(long, env = "GEMINI_API_KEY")]
        api_key: String,

        #[arg(long)]
        model: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Process {
            file,
            document_type,
            model_dir,
            data_dir,
            api_key,
            model,
        } => process(&file, &document_type, &model_dir, &data_dir, api_key, model).await,
        Command::Ask {
            id,
            question,
            data_dir,
            api_key,
            model,
        } => ask(id, &question, &data_dir, api_key, model).await,
    }
}

fn model_client(api_key: String, model: Option<String>) -> HttpModelClient {
    let client = HttpModelClient::new(api_key);
    match model {
        Some(name) => client.with_model(name),
        None => client,
    }
}

async fn process(
    file: &Path,
    document_type: &str,
    model_dir: &Path,
    data_dir: &Path,
    api_key: String,
    model: Option<String>,
) -> anyhow::Result<()> {
    tracing::info!(file = %file.display(), document_type, "processing document");
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
    let text = PlainTextExtractor.extract(&bytes, "text/plain").await?;

    let embedder = Embedder::load(model_dir).context("loading embedding model")?;
    let mut pipeline = Pipeline::new(model_client(api_key, model), embedder);

    let result = pipeline.process(&text, document_type).await?;

    let store = JsonFileStore::open(data_dir)?;
    let grounded = result
        .clause_references
        .iter()
        .filter(|r| !r.matches.is_empty())
        .count();
    let record = DocumentRecord {
        id: 0, // assigned by the store
        filename: file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        document_type: document_type.to_string(),
        original_text: text,
        result,
        processed_at: chrono::Utc::now(),
    };
    let risk = record.result.structured.risk_assessment.overall_risk;
    let clauses = record.result.structured.key_clauses.len();
    let degraded = record.result.degraded;
    let id = store.save(record).await?;

    println!("Document {id} processed");
    println!("  Risk score:       {risk}/10");
    println!("  Key clauses:      {clauses} ({grounded} grounded)");
    if degraded {
        println!("  NOTE: model output was unparseable; result is marked for manual review");
    }
    Ok(())
}

async fn ask(
    id: u64,
    question: &str,
    data_dir: &Path,
    api_key: String,
    model: Option<String>,
) -> anyhow::Result<()> {
    let store = JsonFileStore::open(data_dir)?;
    let record = store.load(id).await?;

    let pipeline: Pipeline<_, ()> = Pipeline::new(model_client(api_key, model), ());
    let answer = pipeline.answer(&record.original_text, question).await?;

    println!("{answer}");
    Ok(())
}
