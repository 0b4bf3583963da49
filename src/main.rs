mod domain;
mod error;
mod merge;
mod net;
mod parser;
mod settings;
mod sources;
mod store;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use chrono::Datelike;
use clap::Parser;
use tracing::info;

use net::HttpClient;
use settings::Settings;
use sources::Source;

#[derive(Parser)]
#[command(name = "namedays", about = "Russian name day calendar scraper")]
struct Cli {
    /// The source to fetch namedays from, or merge previously fetched files
    #[arg(short, long, value_enum, default_value_t = Source::Krestilnoe)]
    source: Source,

    /// Output directory (overrides NAMEDAYS_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let mut settings = Settings::load()?;
    if let Some(dir) = cli.data_dir {
        settings.data_dir = dir;
    }
    info!(?settings, source = cli.source.name(), "Starting namedays");

    let client = HttpClient::new(&settings).context("Failed to build HTTP client")?;
    let year = chrono::Local::now().year();
    let path = settings.data_dir.join(cli.source.file_name());

    let namedays = match cli.source.fetcher(&client, &settings) {
        Some(fetcher) => fetcher
            .fetch_all(year)
            .with_context(|| format!("error fetching namedays from {}", fetcher.name()))?,
        None => {
            let files = store::source_files(&settings.data_dir)?;
            if files.is_empty() {
                bail!(
                    "no *_namedays.json files to merge in {}",
                    settings.data_dir.display()
                );
            }
            merge::merge_files(&files).context("error merging namedays")?
        }
    };

    store::save(&path, &namedays)?;

    println!(
        "Successfully fetched namedays from {} and saved to {}",
        cli.source.name(),
        path.display()
    );
    println!(
        "{} days, {} unique names",
        namedays.len(),
        domain::unique_names(&namedays)
    );

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("Done in {}", format_duration(elapsed));
    }

    Ok(())
}

/// Minutes are the largest unit.
fn format_duration(d: Duration) -> String {
    match d.as_secs() {
        0..=59 => format!("{:.1}s", d.as_secs_f64()),
        secs => format!("{}m {:02}s", secs / 60, secs % 60),
    }
}

// ── Tests ──
