use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use coordinator::{
    CoordinatorConfig, FetchOutcome, HasMoreBasis, PaginatedSearchCoordinator, SearchSnapshot,
};
use data_loader::{parser, Candidate, CandidateCatalog};
use pipeline::{
    classify_profile_url, clean_profile_url, is_valid_profile_url, profile_handle,
    ResultValidator, Verdict,
};
use serde_json::Value;
use sources::CatalogSource;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

/// Expert Search - validated, paginated expert discovery
#[derive(Parser)]
#[command(name = "expert-search")]
#[command(about = "Search, validate and clean expert profile results", long_about = None)]
struct Cli {
    /// Candidate catalog (JSON array, {"experts": [...]}, or JSON lines)
    #[arg(short, long, global = true, default_value = "data/experts.json")]
    catalog: PathBuf,

    /// Coordinator config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a paginated search over the catalog
    Search {
        /// Search query
        #[arg(short, long)]
        query: String,

        /// Maximum number of pages to load
        #[arg(long, default_value = "3")]
        pages: usize,

        /// Override the configured page size
        #[arg(long)]
        page_size: Option<usize>,

        /// Decide has-more from the raw page size instead of the validated one
        #[arg(long)]
        raw_has_more: bool,

        /// Simulated backend latency per page, in milliseconds
        #[arg(long)]
        latency_ms: Option<u64>,

        /// Print the final state as JSON instead of a listing
        #[arg(long)]
        json: bool,
    },

    /// Run the validator over every record in a file
    Validate {
        /// Records to validate (defaults to the catalog)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Only print rejected records
        #[arg(long)]
        rejected_only: bool,
    },

    /// Check and clean profile URLs
    CleanUrl {
        /// URLs to check
        #[arg(required = true)]
        urls: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            query,
            pages,
            page_size,
            raw_has_more,
            latency_ms,
            json,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(page_size) = page_size {
                config = config.with_page_size(page_size);
            }
            if raw_has_more {
                config = config.with_has_more_basis(HasMoreBasis::RawCount);
            }
            config.validate().context("Invalid search settings")?;
            handle_search(&cli.catalog, config, &query, pages, latency_ms, json).await?
        }
        Commands::Validate {
            input,
            rejected_only,
        } => handle_validate(input.as_deref().unwrap_or(cli.catalog.as_path()), rejected_only)?,
        Commands::CleanUrl { urls } => handle_clean_url(&urls),
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<CoordinatorConfig> {
    match path {
        Some(path) => CoordinatorConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(CoordinatorConfig::default()),
    }
}

fn load_catalog(path: &Path) -> Result<Arc<CandidateCatalog>> {
    eprintln!("Loading expert catalog from {}...", path.display());
    let start = Instant::now();
    let catalog = CandidateCatalog::load_from_file(path)
        .with_context(|| format!("Failed to load catalog {}", path.display()))?;
    eprintln!(
        "{} Loaded {} candidates in {:?}",
        "✓".green(),
        catalog.len(),
        start.elapsed()
    );
    Ok(Arc::new(catalog))
}

/// Handle the 'search' command
async fn handle_search(
    catalog_path: &Path,
    config: CoordinatorConfig,
    query: &str,
    pages: usize,
    latency_ms: Option<u64>,
    json: bool,
) -> Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let mut source = CatalogSource::new(catalog);
    if let Some(ms) = latency_ms {
        source = source.with_latency(Duration::from_millis(ms));
    }

    let coordinator = PaginatedSearchCoordinator::new(
        Arc::new(source),
        Arc::new(ResultValidator::standard()),
        config,
    );

    match coordinator.start_search(query).await {
        FetchOutcome::Ignored => bail!("Search query must not be blank"),
        FetchOutcome::Failed => bail!(
            "Search failed: {}",
            coordinator.state().last_error.unwrap_or_default()
        ),
        FetchOutcome::Applied | FetchOutcome::Superseded => {}
    }

    let mut printed = 0;
    if !json {
        println!("{}", format!("Experts for '{}':", query.trim()).bold().blue());
        printed = print_new_experts(&coordinator.state(), printed);
    }

    let mut loaded = 1;
    while loaded < pages && coordinator.state().has_more {
        match coordinator.load_more().await {
            FetchOutcome::Applied => loaded += 1,
            FetchOutcome::Failed => {
                warn!(
                    "Stopping after page {}: {}",
                    loaded,
                    coordinator.state().last_error.unwrap_or_default()
                );
                break;
            }
            FetchOutcome::Ignored | FetchOutcome::Superseded => break,
        }
        if !json {
            printed = print_new_experts(&coordinator.state(), printed);
        }
    }

    let state = coordinator.state();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&state).context("Failed to serialize search state")?
        );
    } else {
        print_summary(&state);
    }
    Ok(())
}

/// Print experts accumulated since the last call; returns the new count.
fn print_new_experts(state: &SearchSnapshot, already_printed: usize) -> usize {
    if let Some(stats) = &state.last_page {
        println!(
            "{}",
            format!(
                "-- page {} ({} returned, {} passed validation, {} new) --",
                stats.page, stats.raw_count, stats.accepted_count, stats.appended_count
            )
            .dimmed()
        );
    }
    for (idx, expert) in state.accumulated.iter().enumerate().skip(already_printed) {
        print_expert(idx + 1, expert);
    }
    state.accumulated.len()
}

fn print_expert(rank: usize, expert: &Candidate) {
    println!(
        "{}. {}",
        rank.to_string().green(),
        expert.display_name().unwrap_or("<unnamed>").bold()
    );
    if let Some(title) = data_loader::non_blank(&expert.title) {
        println!("   {}", title);
    }
    if let Some(affiliation) = expert.affiliation() {
        println!("   {} {}", "@".cyan(), affiliation);
    }
    for link in expert.profile_links() {
        println!(
            "   {} {} ({:?})",
            "→".cyan(),
            clean_profile_url(link),
            classify_profile_url(link)
        );
    }
}

fn print_summary(state: &SearchSnapshot) {
    println!();
    let total = state
        .last_page
        .map(|stats| stats.total_results)
        .unwrap_or_default();
    println!(
        "{} {} experts shown across {} page(s), {} raw matches",
        "✓".green(),
        state.accumulated.len(),
        state.current_page,
        total
    );
    if state.has_more {
        println!("{}", "More results available (raise --pages)".yellow());
    }
    if let Some(error) = &state.last_error {
        println!("{} {}", "!".red(), error);
    }
}

/// Handle the 'validate' command
fn handle_validate(input: &Path, rejected_only: bool) -> Result<()> {
    let records = parser::read_records(input)
        .with_context(|| format!("Failed to read records from {}", input.display()))?;
    let validator = ResultValidator::standard();

    println!(
        "{}",
        format!("Validating {} records from {}:", records.len(), input.display())
            .bold()
            .blue()
    );

    let mut accepted = 0;
    for (idx, record) in records.iter().enumerate() {
        let label = record_label(record);
        match validator.evaluate_value(record) {
            Verdict::Accepted => {
                accepted += 1;
                if !rejected_only {
                    println!("{} {:>4} {}", "✓".green(), idx + 1, label);
                }
            }
            Verdict::Rejected { check, reason } => {
                println!(
                    "{} {:>4} {} [{}] {}",
                    "✗".red(),
                    idx + 1,
                    label,
                    check.yellow(),
                    reason
                );
            }
        }
    }

    println!();
    println!(
        "Accepted {} of {} records ({} rejected)",
        accepted.to_string().green(),
        records.len(),
        (records.len() - accepted).to_string().red()
    );
    Ok(())
}

fn record_label(record: &Value) -> String {
    let name = record
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("<unnamed>");
    match record.get("id") {
        Some(Value::String(id)) => format!("{} ({})", name, id),
        Some(Value::Number(id)) => format!("{} ({})", name, id),
        _ => name.to_string(),
    }
}

/// Handle the 'clean-url' command
fn handle_clean_url(urls: &[String]) {
    for url in urls {
        let status = if is_valid_profile_url(url) {
            "valid".green()
        } else {
            "invalid".red()
        };
        println!("{} [{}] {:?}", url.bold(), status, classify_profile_url(url));

        let cleaned = clean_profile_url(url);
        if cleaned != *url {
            println!("   cleaned: {}", cleaned);
        }
        if let Some(handle) = profile_handle(url) {
            println!("   handle:  {}", handle);
        }
    }
}
