//! Roadmap-Scout main entry point
//!
//! This is the command-line interface for the Roadmap-Scout roadmap and
//! resource finder.

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use roadmap_scout::config::{load_config_with_hash, Config};
use roadmap_scout::generator::ChatCompletionsGenerator;
use roadmap_scout::output::{self, OutputFormat};
use roadmap_scout::pipeline::{
    collect_roadmap_resources, collect_topic_resources, Orchestrator, RoadmapComposer,
    RoadmapService,
};
use roadmap_scout::storage::{open_storage, PersistenceQueue, Storage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Roadmap-Scout: learning roadmaps with curated resources
///
/// Roadmap-Scout asks a text generator for a beginner / intermediate /
/// advanced roadmap on a topic, then finds articles and videos for every
/// level, preferring search APIs and falling back to browser scraping.
#[derive(Parser, Debug)]
#[command(name = "roadmap-scout")]
#[command(version = "1.0.0")]
#[command(about = "Learning roadmaps with curated resources", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Topic to build a roadmap for
    #[arg(value_name = "TOPIC", required_unless_present_any = ["list", "dry_run"])]
    topic: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Only print the roadmap text, using the cache when possible
    #[arg(long, conflicts_with_all = ["resources", "roadmap_resources", "list", "dry_run"])]
    roadmap_only: bool,

    /// Only collect and store resources for the bare topic
    #[arg(long, conflicts_with_all = ["roadmap_only", "roadmap_resources", "list", "dry_run"])]
    resources: bool,

    /// Scrape articles and videos about the topic's roadmap itself
    #[arg(long, conflicts_with_all = ["roadmap_only", "resources", "list", "dry_run"])]
    roadmap_resources: bool,

    /// Show stored resources and statistics from the database and exit
    #[arg(long, conflicts_with_all = ["roadmap_only", "resources", "roadmap_resources", "dry_run"])]
    list: bool,

    /// Validate config and show what would be used without calling anything
    #[arg(long, conflicts_with_all = ["roadmap_only", "resources", "roadmap_resources", "list"])]
    dry_run: bool,

    /// Output format for a full run
    #[arg(long, value_enum, default_value_t = FormatArg::Json)]
    format: FormatArg,

    /// Write the result to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Markdown,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Markdown => OutputFormat::Markdown,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e).context("invalid configuration");
        }
    };
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }
    if cli.list {
        return handle_list(&config);
    }

    let Some(topic) = cli.topic.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
        bail!("a non-empty TOPIC is required");
    };

    let outcome = if cli.roadmap_only {
        handle_roadmap_only(&config, topic).await
    } else if cli.resources {
        handle_resources(&config, topic).await
    } else if cli.roadmap_resources {
        handle_roadmap_resources(&config, topic).await
    } else {
        handle_run(&config, topic, cli.format.into(), cli.output.as_deref()).await
    };

    if let Err(e) = &outcome {
        tracing::error!("Run failed: {:#}", e);
    }
    outcome
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("roadmap_scout=info,warn"),
            1 => EnvFilter::new("roadmap_scout=debug,info"),
            2 => EnvFilter::new("roadmap_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so stdout carries only the rendered result
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be used
fn handle_dry_run(config: &Config) {
    fn presence(value: &Option<String>) -> &'static str {
        match value.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => "set",
            _ => "not set (scraping only)",
        }
    }

    println!("=== Roadmap-Scout Dry Run ===\n");

    println!("Text Generator:");
    println!("  Endpoint: {}", config.generator.endpoint);
    println!("  Model: {}", config.generator.model);
    println!("  Timeout: {}s", config.generator.timeout_secs);

    println!("\nSearch API:");
    println!("  Articles endpoint: {}", config.search_api.articles_endpoint);
    println!("  Videos endpoint: {}", config.search_api.videos_endpoint);
    println!("  Google API key: {}", presence(&config.search_api.google_api_key));
    println!("  Google engine id: {}", presence(&config.search_api.google_cx));
    println!("  YouTube API key: {}", presence(&config.search_api.youtube_api_key));

    println!("\nScraper:");
    println!("  Articles search page: {}", config.scraper.articles_search_url);
    println!("  Videos search page: {}", config.scraper.videos_search_url);
    println!("  Headless: {}", config.scraper.headless);
    println!(
        "  Navigation / marker timeout: {}s / {}s",
        config.scraper.navigation_timeout_secs, config.scraper.marker_timeout_secs
    );

    println!("\nRetry:");
    println!("  Max attempts: {}", config.retry.max_attempts);
    println!("  Backoff: {}ms", config.retry.backoff_ms);
    match config.retry.fetch_deadline_secs {
        Some(secs) => println!("  Fetch deadline: {}s", secs),
        None => println!("  Fetch deadline: none"),
    }

    println!("\nStorage:");
    println!("  Database: {}", config.storage.database_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the --list mode: shows stored resources and statistics
fn handle_list(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.storage.database_path);

    let storage = open_storage(Path::new(&config.storage.database_path))
        .context("failed to open resource database")?;

    let records = storage.list_resources()?;
    output::print_resources(&records);

    let stats = output::load_statistics(&storage)?;
    output::print_statistics(&stats);

    Ok(())
}

/// Handles the --roadmap-only mode: prints cached or freshly generated roadmap text
async fn handle_roadmap_only(config: &Config, topic: &str) -> anyhow::Result<()> {
    let mut storage = open_storage(Path::new(&config.storage.database_path))
        .context("failed to open resource database")?;

    let generator = ChatCompletionsGenerator::from_config(&config.generator)?;
    let service = RoadmapService::new(RoadmapComposer::new(Arc::new(generator)));

    let roadmap = service.roadmap(&mut storage, topic).await?;
    println!("{}", roadmap);

    Ok(())
}

/// Handles the --resources mode: collects and stores resources for the bare topic
async fn handle_resources(config: &Config, topic: &str) -> anyhow::Result<()> {
    let mut storage = open_storage(Path::new(&config.storage.database_path))
        .context("failed to open resource database")?;

    let orchestrator = Orchestrator::from_config(config)?;
    let set = collect_topic_resources(orchestrator.aggregator(), &mut storage, topic).await?;

    println!("{}", output::resources_to_json(&set)?);

    Ok(())
}

/// Handles the --roadmap-resources mode: scrapes resources about the roadmap itself
async fn handle_roadmap_resources(config: &Config, topic: &str) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::from_config(config)?;
    let set = collect_roadmap_resources(orchestrator.aggregator(), topic).await;

    println!("{}", output::roadmap_resources_to_json(topic, &set)?);

    Ok(())
}

/// Handles the default mode: full pipeline run
async fn handle_run(
    config: &Config,
    topic: &str,
    format: OutputFormat,
    output_path: Option<&Path>,
) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::from_config(config)?;

    // Persistence is best-effort; a run without a database still returns a result
    let (orchestrator, worker) = match open_storage(Path::new(&config.storage.database_path)) {
        Ok(storage) => {
            let (queue, worker) = PersistenceQueue::spawn(storage);
            (orchestrator.with_persistence(queue), Some(worker))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Resource database unavailable, results will not be stored");
            (orchestrator, None)
        }
    };

    tracing::info!(%topic, "Starting pipeline run");
    let outcome = match orchestrator.run(topic).await {
        Ok(result) => output::emit(&result, format, output_path).map_err(anyhow::Error::from),
        Err(e) => Err(e.into()),
    };

    // Close the queue so the worker can drain and stop
    drop(orchestrator);
    if let Some(worker) = worker {
        let saved = worker.finish().await;
        tracing::info!(saved, "Persistence finished");
    }

    outcome?;
    if let Some(path) = output_path {
        tracing::info!("Result written to: {}", path.display());
    }

    Ok(())
}
