mod analyzer;
mod cli;
mod config;
mod model;
mod normalizer;
mod parser;
mod report;
mod scraper;
mod storage;
mod utils;

use analyzer::rating;
use analyzer::rater::BatchOutcome;
use analyzer::{HardwareResolver, LaptopRater};
use clap::Parser;
use cli::{Cli, Commands};
use config::{load_config, AppConfig};
use futures::future::join_all;
use model::{BenchmarkTable, HardwareClass, PipelineError, StoredSpec};
use parser::{BenchmarkParser, ListingParser, PageParser, SpecParser};
use crate::scraper::fetcher::{fetch_all, Throttle};
use crate::scraper::{Scraper, ScraperImpl};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use storage::SqliteStorage;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use utils::laptop_id_from_link;

#[tokio::main]
async fn main() {
    init_tracing();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {:?}", panic_info);
    }));

    let cli = Cli::parse();

    if let Err(e) = run(&cli).await {
        error!("{:?} failed: {}", cli.command, e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: &Cli) -> Result<(), PipelineError> {
    let config = if Path::new(&cli.config).exists() {
        load_config(&cli.config)?
    } else {
        warn!("Config {} not found, using defaults", cli.config);
        AppConfig::default()
    };

    let storage = SqliteStorage::new(&config.db_path)?;

    match cli.command {
        Commands::Listings => collect_listings(&config, &storage).await,
        Commands::Specs => collect_specs(&config, &storage).await,
        Commands::Benchmarks => collect_benchmarks(&config, &storage).await,
        Commands::Rate => {
            rate_laptops(&config, &storage).await?;
            print_report(&storage)
        }
        Commands::Report => print_report(&storage),
        Commands::All => {
            collect_listings(&config, &storage).await?;
            collect_specs(&config, &storage).await?;
            collect_benchmarks(&config, &storage).await?;
            rate_laptops(&config, &storage).await?;
            print_report(&storage)
        }
    }
}

/// Scrapes the listing page and stores the product links.
async fn collect_listings(config: &AppConfig, storage: &SqliteStorage) -> Result<(), PipelineError> {
    let url = config.listing_page_url();
    info!("Scraping listing page {}", url);

    let scraper = ScraperImpl::new(config)?;
    let html = scraper.fetch(&url).await?;

    let links = match ListingParser::new(&config.link_prefix).parse(&html) {
        Ok(links) => links,
        Err(e) => {
            log_and_save_html(&html, "listing");
            return Err(e.into());
        }
    };

    storage.save_links(&links)?;
    info!("Stored {} laptop links", links.len());
    Ok(())
}

/// Fetches the spec page of every listed laptop that has no stored spec yet.
async fn collect_specs(config: &AppConfig, storage: &SqliteStorage) -> Result<(), PipelineError> {
    let links = storage.get_links()?;
    let known = storage.fresh_spec_ids(chrono::Utc::now(), config.spec_max_age())?;
    let pending: Vec<String> = links
        .iter()
        .filter(|link| !known.contains(&laptop_id_from_link(link, &config.link_prefix)))
        .map(|link| config.product_url(link))
        .collect();

    info!(
        "Setting up spec files: {} listed, {} stored and fresh, {} to fetch",
        links.len(),
        links.len() - pending.len(),
        pending.len()
    );
    if pending.is_empty() {
        return Ok(());
    }

    let scraper = ScraperImpl::new(config)?;
    let throttle = Throttle::from_config(config);
    let parser = SpecParser::new();
    let chunk_size = (pending.len() / 10).max(1);
    let mut done = 0;

    for chunk in pending.chunks(chunk_size) {
        let results = fetch_all(&scraper, &throttle, chunk.to_vec(), config.max_concurrent_requests).await;

        for (url, result) in results {
            let link = url.strip_prefix(&config.site_base_url).unwrap_or(&url);
            let laptop_id = laptop_id_from_link(link, &config.link_prefix);

            let html = match result {
                Ok(html) => html,
                Err(e) => {
                    warn!("Fetch failed for {}: {}", laptop_id, e);
                    continue;
                }
            };

            match parser.parse(&html) {
                Ok(Some(spec)) => {
                    if let Err(e) = storage.save_spec(&laptop_id, &spec, chrono::Utc::now()) {
                        warn!("DB save error for {}: {}", laptop_id, e);
                    }
                }
                Ok(None) => info!("No specs found for {}", laptop_id),
                Err(e) => {
                    warn!("Parse error for {}: {}", laptop_id, e);
                    log_and_save_html(&html, &laptop_id);
                }
            }
        }

        done += chunk.len();
        info!("{} out of {}", done, pending.len());
    }

    Ok(())
}

/// Scrapes and stores both benchmark tables. A table that comes back empty
/// aborts the stage before anything is overwritten.
async fn collect_benchmarks(config: &AppConfig, storage: &SqliteStorage) -> Result<(), PipelineError> {
    let scraper = ScraperImpl::new(config)?;
    let parser = BenchmarkParser::new();

    for class in [HardwareClass::Cpu, HardwareClass::Gpu] {
        let url = config.benchmark_url(class);
        info!("Setting up {} benchmark table from {}", class, url);

        let html = scraper.fetch(url).await?;
        let entries = match parser.parse(&html) {
            Ok(entries) if !entries.is_empty() => entries,
            Ok(_) => {
                log_and_save_html(&html, class.as_str());
                return Err(model::BenchmarkError::EmptyTable(class).into());
            }
            Err(e) => {
                log_and_save_html(&html, class.as_str());
                return Err(e.into());
            }
        };

        storage.save_benchmarks(class, &entries)?;
        info!("Stored {} {} benchmark entries", entries.len(), class);
    }

    Ok(())
}

/// Rates every stored spec against frozen benchmark tables and stores the scores.
async fn rate_laptops(config: &AppConfig, storage: &SqliteStorage) -> Result<(), PipelineError> {
    info!("Rating laptops");

    // Both tables are complete before any worker reads them.
    let cpus = Arc::new(BenchmarkTable::from_entries(
        HardwareClass::Cpu,
        storage.get_benchmarks(HardwareClass::Cpu)?,
    )?);
    let gpus = Arc::new(BenchmarkTable::from_entries(
        HardwareClass::Gpu,
        storage.get_benchmarks(HardwareClass::Gpu)?,
    )?);
    info!("Benchmark tables: {} CPUs, {} GPUs", cpus.len(), gpus.len());

    let rater = Arc::new(LaptopRater::new(
        HardwareResolver::new(config.similarity_floor),
        config.labels.clone(),
    ));

    let specs = storage.get_all_specs()?;
    let outcome = rate_in_parallel(rater, cpus, gpus, specs).await;

    info!(
        "Rated {} laptops, skipped {} malformed records",
        outcome.scores.len(),
        outcome.skipped.len()
    );
    storage.save_scores(&outcome.scores)?;
    Ok(())
}

async fn rate_in_parallel(
    rater: Arc<LaptopRater>,
    cpus: Arc<BenchmarkTable>,
    gpus: Arc<BenchmarkTable>,
    specs: Vec<StoredSpec>,
) -> BatchOutcome {
    let workers = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    let chunk_size = specs.len().div_ceil(workers).max(1);

    let tasks: Vec<_> = specs
        .chunks(chunk_size)
        .map(|chunk| {
            let chunk = chunk.to_vec();
            let rater = rater.clone();
            let cpus = cpus.clone();
            let gpus = gpus.clone();
            tokio::task::spawn_blocking(move || rater.rate_all(&chunk, &cpus, &gpus))
        })
        .collect();

    let mut outcome = BatchOutcome::default();
    for joined in join_all(tasks).await {
        match joined {
            Ok(part) => {
                outcome.scores.extend(part.scores);
                outcome.skipped.extend(part.skipped);
            }
            Err(e) => error!("Rating worker failed: {}", e),
        }
    }
    outcome
}

fn print_report(storage: &SqliteStorage) -> Result<(), PipelineError> {
    let ranking = rating::rank(storage.get_scores()?);
    for laptop in &ranking.invalid {
        warn!("{}: price {} is not positive, left out of the ranking", laptop.name, laptop.price);
    }
    print!("{}", report::render(&ranking));
    Ok(())
}

/// Logs and saves the provided HTML for debugging purposes.
fn log_and_save_html(html: &str, name: &str) {
    let folder = Path::new("logs/html");
    if let Err(e) = fs::create_dir_all(folder) {
        warn!("Failed to create debug folder: {}", e);
        return;
    }
    let filename = folder.join(format!("debug-{}.html", name.replace(' ', "_")));
    if let Err(e) = fs::write(&filename, html) {
        warn!("Failed to write debug HTML: {}", e);
    } else {
        info!("Saved debug HTML: {}", filename.display());
    }
}
