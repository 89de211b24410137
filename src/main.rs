use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser, Subcommand};
use colored::*;
use dotenv::dotenv;
use tracing::{error, info};
use tv_recon::{report, AppConfig, ReconEngine, SourceTag, SqliteInventory};

#[derive(Debug, Parser)]
#[command(name = "tv-recon")]
#[command(about = "Reconcile scanner, Sonarr and Plex views of a media library", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Join the configured catalogs and report missing files
    Reconcile {
        /// Substring or glob filter applied to canonical paths
        #[arg(long)]
        filter: Option<String>,
        /// Only print rows missing from at least one catalog
        #[arg(long)]
        mismatches_only: bool,
        /// Also write the rows to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// List filenames appearing more than once within one catalog
    DupeFilenames {
        /// Catalog to inspect: files, sonarr or plex
        source: SourceTag,
    },
    /// List one catalog's live files with a video extension
    VideoFiles {
        /// Catalog to inspect: files, sonarr or plex
        source: SourceTag,
    },
    /// Print configuration values
    PrintConfig,
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let _guard = tv_recon::logging::init_logger();

    let config = match tv_recon::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    match args.command {
        Some(Commands::Reconcile {
            filter,
            mismatches_only,
            csv,
        }) => {
            if let Err(err) = run_reconcile(&config, filter.as_deref(), mismatches_only, csv) {
                error!("Error: {}", err);
                process::exit(1);
            }
        }
        Some(Commands::DupeFilenames { source }) => {
            if let Err(err) = run_dupe_filenames(&config, source) {
                error!("Error: {}", err);
                process::exit(1);
            }
        }
        Some(Commands::VideoFiles { source }) => {
            if let Err(err) = run_video_files(&config, source) {
                error!("Error: {}", err);
                process::exit(1);
            }
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
        }
        None => {
            let _ = Cli::command().print_long_help();
        }
    }

    Ok(())
}

fn run_reconcile(
    config: &AppConfig,
    filter: Option<&str>,
    mismatches_only: bool,
    csv: Option<PathBuf>,
) -> anyhow::Result<()> {
    let inventory = SqliteInventory::open(&config.db_path);
    let engine = ReconEngine::new(config.clone());
    let outcome = engine.run(&inventory)?;

    let (rows, filter_diag) = report::filter_rows(&outcome.rows, filter);
    if let Some(diag) = filter_diag {
        println!("{}", diag.yellow());
    }

    let mut match_count = 0usize;
    let mut mismatch_count = 0usize;
    for row in &rows {
        if row.present_in == outcome.active {
            match_count += 1;
            if !mismatches_only {
                println!("{}  [{}]", row.canonical_path, report::join_tags(&row.present_in));
            }
        } else {
            mismatch_count += 1;
            println!(
                "{}  [{}]  missing from: {}",
                row.canonical_path,
                report::join_tags(&row.present_in),
                report::join_tags(&row.missing_from(&outcome.active)).red(),
            );
        }
    }

    for dupe in &outcome.diagnostics.duplicates {
        println!(
            "{} duplicate in {}: {} ({} records)",
            "note:".yellow(),
            dupe.source,
            dupe.canonical_path,
            dupe.count,
        );
    }

    println!();
    info!(
        "Load: {}, Join: {}",
        format!("{:.2}s", outcome.load_duration.as_secs_f64()).green(),
        format!("{:.2}s", outcome.join_duration.as_secs_f64()).green(),
    );
    info!(
        "{} matched, {} mismatched, {} records skipped",
        format!("{}", match_count).green(),
        format!("{}", mismatch_count).red(),
        format!("{}", outcome.diagnostics.total_skipped()).yellow(),
    );

    if let Some(csv_path) = csv {
        report::write_csv(&csv_path, &rows, &outcome.active)?;
        info!("Rows written to {}", csv_path.display());
    }

    Ok(())
}

fn run_dupe_filenames(config: &AppConfig, source: SourceTag) -> anyhow::Result<()> {
    let records = load_source(config, source)?;
    let groups = report::duplicate_filenames(&records);

    if groups.is_empty() {
        println!("No duplicate filenames in {}", source);
        return Ok(());
    }
    for group in &groups {
        println!("{:>5}  {}", group.count, group.filename);
    }
    info!("{} duplicated filenames in {}", groups.len(), source);
    Ok(())
}

fn run_video_files(config: &AppConfig, source: SourceTag) -> anyhow::Result<()> {
    let records = load_source(config, source)?;
    let videos = report::video_files(&records, &config.video_extensions);

    for record in &videos {
        println!("{}/{}", record.parent_path, record.filename);
    }
    info!("{} video files in {}", videos.len(), source);
    Ok(())
}

fn load_source(
    config: &AppConfig,
    source: SourceTag,
) -> anyhow::Result<Vec<tv_recon::FileRecord>> {
    use tv_recon::InventorySource;
    let inventory = SqliteInventory::open(&config.db_path);
    Ok(inventory.load(source)?)
}
