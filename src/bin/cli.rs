//! feedpress CLI
//!
//! Local execution entry point. For AWS Lambda, use `feedpress-lambda`.

use std::path::PathBuf;

use chrono::DateTime;
use clap::{Parser, Subcommand};
use feedpress::{
    config::{ACCESS_TOKEN_VAR, load_config, load_config_strict},
    error::{AppError, Result},
    models::Item,
    pipeline::{Pipeline, run_pipeline},
    record,
    services::fetch_site_catalog,
    utils::{http, normalize_title},
};

/// feedpress - publish new feed articles as Markdown records
#[derive(Parser, Debug)]
#[command(name = "feedpress", version, about = "RSS/Atom to Markdown publisher")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch every catalog feed and publish new records
    Run {
        /// Write records into this directory instead of the remote repository
        #[arg(long, value_name = "DIR")]
        dry_run: Option<PathBuf>,
    },

    /// Render a single record and print it
    Render {
        #[arg(long)]
        title: String,

        /// Publication time, RFC 3339
        #[arg(long)]
        date: String,

        #[arg(long)]
        link: String,

        /// Site tag, e.g. `example.com`
        #[arg(long)]
        site: String,

        #[arg(long)]
        language: Option<String>,

        /// Category, may be repeated
        #[arg(long = "category")]
        categories: Vec<String>,
    },

    /// List the sites in the remote catalog
    Sites,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // `validate` must see parse errors instead of falling back to defaults
    let config = match cli.command {
        Command::Validate => load_config_strict(&cli.config)?,
        _ => load_config(&cli.config)?,
    };
    log::debug!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Run { dry_run } => {
            let report = match dry_run {
                Some(dir) => {
                    log::info!("Dry run: writing records to {}", dir.display());
                    Pipeline::local(config, dir)?.run().await?
                }
                None => run_pipeline(config, std::env::var(ACCESS_TOKEN_VAR).ok()).await?,
            };
            log::info!(
                "Done: {} published, {} skipped, {} failed",
                report.published,
                report.skipped,
                report.failed
            );
        }

        Command::Render {
            title,
            date,
            link,
            site,
            language,
            categories,
        } => {
            let published_at = DateTime::parse_from_rfc3339(&date)
                .map_err(|e| AppError::config(format!("invalid --date '{date}': {e}")))?;
            let item = Item {
                title: normalize_title(&title),
                link: Some(link),
                published_at: Some(published_at),
                categories,
                site_tag: site,
                language,
            };

            let record = record::render(&item)?;
            println!("{}", record.path(&config.store.content_root));
            print!("{}", record.body);
        }

        Command::Sites => {
            let client = http::create_async_client(&config.crawler)?;
            let sites = fetch_site_catalog(&client, &config.catalog.url).await?;
            for (key, site) in &sites {
                match site.language() {
                    Some(language) => println!("{key}\t{}\t{language}", site.feed_url),
                    None => println!("{key}\t{}", site.feed_url),
                }
            }
            log::info!("{} sites", sites.len());
        }

        Command::Validate => {
            log::info!("✓ Config OK ({})", cli.config.display());
        }
    }

    Ok(())
}
