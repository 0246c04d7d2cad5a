//! Command-line entry point: discover, sync, query, serve.

mod telemetry;

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::{error, info};

use agent::{AgentConfig, DiscoveryAgent};
use insight_engine::{
    AnswerOptions, AnswerPipeline, AnswerResult, RetryPolicy, SyncPipeline, SyncReport,
    SyncStatus, dedup_from_env,
};
use llm_service::LlmServiceProfiles;
use record_store::{MongoRecordStore, RecordStore, StoreConfig};
use vector_index::{IndexConfig, ProfileEmbedder, QdrantIndex};

/// Batch size for the scheduled sync job when `SCHEDULED_SYNC_LIMIT` is not
/// set.
const DEFAULT_SCHEDULED_SYNC_LIMIT: usize = 5;

#[derive(Parser)]
#[command(
    name = "podsight",
    about = "Discover and analyze AI podcast content",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Answer a question from indexed podcast summaries
    Query {
        /// Query or topic to analyze
        #[arg(short, long)]
        message: String,
    },
    /// Sync recent podcast records into the vector index
    Sync {
        /// Number of recent podcasts to sync
        #[arg(short, long, default_value_t = 1)]
        limit: usize,
    },
    /// Run the discovery agent once: search, summarize, mail, store
    Discover {
        /// Search topic (default: DISCOVERY_QUERY from the environment)
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Start the HTTP API
    Serve,
    /// Run the scheduled jobs and exit
    Jobs {
        /// Which job to run
        #[arg(long, value_enum, default_value_t = Job::All)]
        job: Job,
    },
    /// Probe the configured LLM providers and print the results
    Health,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Job {
    All,
    Discover,
    Sync,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file when present.
    dotenvy::dotenv().ok();

    if let Err(e) = telemetry::init() {
        eprintln!("failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse();

    if provider_key_missing() {
        error!("OPENAI_API_KEY environment variable is not set");
        println!("Error: OPENAI_API_KEY is required. Please set it in your .env file.");
        return ExitCode::FAILURE;
    }

    match run(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            error!("Error executing command: {e}");
            eprintln!("{} {e}", "Error:".red());
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> anyhow::Result<ExitCode> {
    match command {
        Command::Query { message } => {
            let answered = answer_question(&message).await?;

            println!("Generated insights for query: '{message}'");
            println!();
            println!("Response:");
            println!("{}", answered.response);
            if !answered.metadata.is_empty() {
                let note = format!("[{} indexed episode(s) cited]", answered.metadata.len());
                println!("\n{}", note.dimmed());
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Sync { limit } => {
            let report = sync_podcasts(limit).await?;
            println!("Vector DB sync result: {}", report.message);
            Ok(match report.status {
                SyncStatus::Success => ExitCode::SUCCESS,
                SyncStatus::Error => ExitCode::FAILURE,
            })
        }

        Command::Discover { query } => {
            let cfg = AgentConfig::from_env()?;
            let topic = query.unwrap_or_else(|| cfg.discovery_query.clone());

            let outcome = discover(&cfg, &topic).await?;
            println!(
                "Discovery run for '{topic}' finished in {} step(s)",
                outcome.steps
            );
            println!();
            println!("{}", outcome.report);
            Ok(ExitCode::SUCCESS)
        }

        Command::Serve => {
            api::start().await?;
            Ok(ExitCode::SUCCESS)
        }

        Command::Jobs { job } => {
            info!("Starting scheduled jobs");
            let mut all_ok = true;

            if matches!(job, Job::All | Job::Discover) {
                all_ok &= run_discovery_job().await;
            }
            if matches!(job, Job::All | Job::Sync) {
                all_ok &= run_sync_job().await;
            }

            info!("Scheduled jobs completed");
            Ok(if all_ok {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Command::Health => {
            let profiles = LlmServiceProfiles::from_env()?;
            let statuses = profiles.health_all().await?;
            println!("{}", serde_json::to_string_pretty(&statuses)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Wires the retrieval-answer pipeline and runs one question through it.
async fn answer_question(message: &str) -> anyhow::Result<AnswerResult> {
    let profiles = Arc::new(LlmServiceProfiles::from_env()?);

    let index_cfg = IndexConfig::from_env()?;
    let dim = index_cfg.dim;
    let index = QdrantIndex::connect(&index_cfg).await?;
    let embedder = ProfileEmbedder::new(profiles.clone(), dim);

    let pipeline = AnswerPipeline::new(
        Arc::new(index),
        Arc::new(embedder),
        profiles,
        AnswerOptions::default(),
    );

    info!("Generating insights for query: {message}");
    Ok(pipeline.answer(message).await?)
}

/// Wires the sync pipeline and pushes the `limit` most recent records.
async fn sync_podcasts(limit: usize) -> anyhow::Result<SyncReport> {
    let profiles = Arc::new(LlmServiceProfiles::from_env()?);

    let store_cfg = StoreConfig::from_env()?;
    let store: Arc<dyn RecordStore> = Arc::new(MongoRecordStore::connect(&store_cfg).await?);

    let index_cfg = IndexConfig::from_env()?;
    let dim = index_cfg.dim;
    let index = QdrantIndex::connect(&index_cfg).await?;
    let embedder = ProfileEmbedder::new(profiles, dim);

    let pipeline = SyncPipeline::new(
        store,
        Arc::new(index),
        Arc::new(embedder),
        RetryPolicy::from_env(),
    )
    .dedup_by_episode(dedup_from_env());

    info!("Fetching {limit} latest podcasts for vector DB sync");
    Ok(pipeline.sync_latest(limit).await)
}

/// Wires the discovery agent with its full tool set and runs one topic.
async fn discover(cfg: &AgentConfig, topic: &str) -> anyhow::Result<agent::AgentOutcome> {
    let profiles = Arc::new(LlmServiceProfiles::from_env()?);

    let store_cfg = StoreConfig::from_env()?;
    let store: Arc<dyn RecordStore> = Arc::new(MongoRecordStore::connect(&store_cfg).await?);

    let runner = DiscoveryAgent::with_default_tools(profiles, store, cfg)?;

    info!("Generating insights for query: {topic}");
    Ok(runner.run(topic).await?)
}

/// Scheduled discovery: topic from the environment, failures logged, never
/// propagated to the other jobs.
async fn run_discovery_job() -> bool {
    let cfg = match AgentConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Error during podcast discovery: {e}");
            return false;
        }
    };
    let topic = cfg.discovery_query.clone();
    info!("Running scheduled podcast discovery with query: {topic}");

    match discover(&cfg, &topic).await {
        Ok(_) => {
            info!("Podcast discovery completed successfully");
            true
        }
        Err(e) => {
            error!("Error during podcast discovery: {e}");
            false
        }
    }
}

/// Scheduled sync: batch size from the environment, success only when the
/// report says so.
async fn run_sync_job() -> bool {
    let limit = std::env::var("SCHEDULED_SYNC_LIMIT")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(DEFAULT_SCHEDULED_SYNC_LIMIT);
    info!("Running scheduled vector DB sync for {limit} podcasts");

    match sync_podcasts(limit).await {
        Ok(report) => {
            info!("Vector sync completed: {}", report.message);
            matches!(report.status, SyncStatus::Success)
        }
        Err(e) => {
            error!("Error during vector sync: {e}");
            false
        }
    }
}

/// The OpenAI provider family cannot run without its key; Ollama needs none.
fn provider_key_missing() -> bool {
    let kind = std::env::var("LLM_KIND").unwrap_or_else(|_| "openai".into());
    kind.trim().eq_ignore_ascii_case("openai")
        && std::env::var("OPENAI_API_KEY")
            .map(|v| v.trim().is_empty())
            .unwrap_or(true)
}
