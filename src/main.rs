use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info};

use meetup_scrape::config::Settings;
use meetup_scrape::dedup::Deduplicator;
use meetup_scrape::error::ScrapeError;
use meetup_scrape::pacer::{Pacer, RandomPacer};
use meetup_scrape::scraping::{self, ScrapeOptions};
use meetup_scrape::session::ChromeSession;
use meetup_scrape::{output, robots};

#[derive(Parser)]
#[command(
    name = "meetup-scrape",
    about = "Scrape Meetup events from a search results URL"
)]
struct Cli {
    /// Meetup events search URL to scrape
    url: String,

    /// Maximum number of scrolls to perform
    #[arg(short = 'm', long, default_value_t = 3)]
    max_pages: u32,

    /// Output filename under the data directory
    #[arg(short, long, default_value = "events.json")]
    output: String,

    /// Keep scrolling until no new events appear, ignoring --max-pages
    #[arg(short, long)]
    exhaustive: bool,

    /// Directory the output file is written to
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Consecutive no-growth scrolls required before concluding convergence
    #[arg(long, default_value_t = 1)]
    settle_rounds: u32,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    let parsed = reqwest::Url::parse(&cli.url).context("invalid url argument")?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        bail!("only http/https URLs are supported, got: {}", parsed.scheme());
    }

    let settings = Settings::default();
    let pacer = RandomPacer;

    let verdict = robots::check(&cli.url, &settings.user_agent);
    if !verdict.allowed {
        return Err(ScrapeError::RobotsDisallowed(cli.url).into());
    }
    if let Some(delay) = verdict.crawl_delay {
        info!(delay, "respecting robots.txt crawl delay");
        pacer.pause(delay, delay);
    }

    let mut session = ChromeSession::launch(&settings)?;

    let mut options = ScrapeOptions::from_settings(&settings);
    options.max_pages = cli.max_pages;
    options.exhaustive = cli.exhaustive;
    options.settle_rounds = cli.settle_rounds.max(1);

    let mut dedup = Deduplicator::new();
    scraping::scrape_events(&mut session, &cli.url, &options, &pacer, &mut dedup)?;
    drop(session);

    let records = dedup.into_records();
    info!(count = records.len(), "scraping completed");

    match output::save_events(&records, &cli.data_dir, &cli.output) {
        Ok(path) => {
            info!(path = %path.display(), "done");
            Ok(())
        }
        Err(err) => {
            error!(
                count = records.len(),
                "collected events are lost: output write failed"
            );
            Err(err.into())
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer.compact())
        .try_init();
}
