//! # Filter Runtime CLI
//!
//! ```text
//! filter-runtime [--config PATH] scan [--content-type TYPE] [--only NAME]... [FILES]...
//! filter-runtime [--config PATH] check PHRASE
//! filter-runtime [--config PATH] stats
//! ```

use std::collections::HashSet;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use filter_runtime::{ContentClassifier, FilterRuntime, RuntimeConfig};
use shared_types::CategoryId;
use tf_01_text_triggers::TriggerMatcher;

#[derive(Parser, Debug)]
#[command(name = "filter-runtime", version, about = "Text trigger content filter")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify files (or stdin) and print one verdict per input
    Scan {
        /// Content type the inputs are treated as
        #[arg(long, default_value = "text/html")]
        content_type: String,

        /// Only block on these categories (by list name)
        #[arg(long = "only")]
        only: Vec<String>,

        files: Vec<PathBuf>,
    },
    /// Look a phrase up as one whole trigger
    Check { phrase: String },
    /// Print rule-set counts and engine metrics
    Stats,
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Category ids named by `--only`; `None` means every category applies.
fn resolve_only(runtime: &FilterRuntime, names: &[String]) -> Result<Option<HashSet<CategoryId>>> {
    if names.is_empty() {
        return Ok(None);
    }
    let mut ids = HashSet::new();
    for name in names {
        match runtime.category_id(name) {
            Some(id) => {
                ids.insert(id);
            }
            None => bail!("unknown category: {name}"),
        }
    }
    Ok(Some(ids))
}

async fn read_input(path: Option<&PathBuf>) -> Result<Vec<u8>> {
    match path {
        Some(path) => tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        None => tokio::task::spawn_blocking(|| {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf).map(|_| buf)
        })
        .await?
        .context("Failed to read stdin"),
    }
}

async fn scan(
    runtime: Arc<FilterRuntime>,
    content_type: &str,
    only: &[String],
    files: &[PathBuf],
) -> Result<()> {
    let allowed = resolve_only(&runtime, only)?;
    let applies = |id: CategoryId| allowed.as_ref().map_or(true, |ids| ids.contains(&id));
    let classifier = ContentClassifier::new(runtime);

    let inputs: Vec<Option<&PathBuf>> = if files.is_empty() {
        vec![None]
    } else {
        files.iter().map(Some).collect()
    };

    for input in inputs {
        let label = input.map_or_else(|| "-".to_string(), |p| p.display().to_string());
        let body = read_input(input).await?;
        match classifier.classify(&body, content_type, &applies) {
            Ok(Some(verdict)) => println!(
                "{label}\tBLOCK\t{}\t{}\t{}",
                verdict.category_id,
                verdict.category_name.as_deref().unwrap_or("-"),
                verdict.trigger
            ),
            Ok(None) => println!("{label}\tALLOW"),
            Err(e) => {
                warn!(input = %label, error = %e, "Classification failed; blocking");
                println!("{label}\tBLOCK\t-\t-\t{e}");
            }
        }
    }
    Ok(())
}

fn check(runtime: &FilterRuntime, phrase: &str) -> Result<()> {
    match runtime.engine().is_exact_trigger(phrase, &|_| true)? {
        Some(id) => {
            let name = runtime.engine().category_label(id);
            println!("TRIGGER\t{id}\t{}", name.as_deref().unwrap_or("-"));
        }
        None => println!("NOT A TRIGGER"),
    }
    Ok(())
}

fn stats(runtime: &FilterRuntime) {
    let stats = runtime.stats();
    let load = runtime.last_load();
    let metrics = runtime.metrics();

    println!("triggers            {}", stats.triggers);
    println!("first_words         {}", stats.first_words);
    println!("enabled_categories  {}", stats.enabled_categories);
    println!("categories          {}", runtime.registry().len());
    println!("lists_loaded        {}", load.lists_loaded);
    println!("lists_missing       {}", load.lists_missing);
    println!("lists_skipped       {}", load.lists_skipped);
    println!("lists_rejected      {}", load.lists_rejected);
    println!("lines_skipped       {}", load.lines_skipped);
    println!("scans               {}", metrics.scans);
    println!("matches             {}", metrics.matches);
    println!("store_errors        {}", metrics.store_errors);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = RuntimeConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    init_logging(&config.logging.level)?;

    info!(
        source = %config.rules.source.display(),
        backend = ?config.storage.backend,
        "Starting filter runtime"
    );
    let runtime = FilterRuntime::load_async(config)
        .await
        .context("Failed to load rule-set")?;

    match cli.command {
        Command::Scan {
            content_type,
            only,
            files,
        } => scan(runtime, &content_type, &only, &files).await,
        Command::Check { phrase } => check(&runtime, &phrase),
        Command::Stats => {
            stats(&runtime);
            Ok(())
        }
    }
}
