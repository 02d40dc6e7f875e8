//! coauthors - Google Scholar co-author list grabber
//!
//! Resolves an author profile by name or scholar id and writes the profile's
//! co-author list to a CSV file, e.g. for collaborator disclosure on
//! proposals.
//!
//! ```bash
//! coauthors -n "Stefan Bringuier" -o coauthors.csv
//! coauthors --google-scholar-id MhJTimgAAAAJ -vv
//! ```

use anyhow::{Context, Result};
use clap::{ArgAction, ArgGroup, Parser};
use coauthors::export;
use coauthors::resolve::{resolve, AuthorQuery, StdinSelector};
use coauthors::scholar::{ClientOptions, ScholarClient};
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, EnvFilter};

/// Generate a CSV file of co-authors for proposals.
#[derive(Parser)]
#[command(name = "coauthors")]
#[command(version, about, long_about = None)]
#[command(group(
    ArgGroup::new("author")
        .required(true)
        .args(["name", "google_scholar_id"]),
))]
struct Cli {
    /// Author name
    #[arg(short, long)]
    name: Option<String>,

    /// Author's institution, narrows a name search
    #[arg(long, visible_alias = "inst", requires = "name")]
    institution: Option<String>,

    /// Google scholar id. See sequence after scholar.google.com/citations?user=... for id
    #[arg(long, visible_alias = "id")]
    google_scholar_id: Option<String>,

    /// Path and name of file for saving coauthors
    #[arg(short, long, default_value = "coauthors.csv")]
    output_file: PathBuf,

    /// Proxy URL for all Scholar requests (e.g. http://127.0.0.1:7890)
    #[arg(long)]
    proxy: Option<String>,

    /// Increase log verbosity (-v: info, -vv: debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let options = ClientOptions {
        proxy: cli.proxy,
        base_url: None,
    };
    let client = ScholarClient::new(&options)?;

    debug!("Querying google scholar...");

    let query = match cli.google_scholar_id {
        Some(scholar_id) => AuthorQuery::ById(scholar_id),
        None => AuthorQuery::ByName {
            name: cli.name.context("author name required")?,
            institution: cli.institution,
        },
    };

    let author = resolve(&client, &query, &StdinSelector).await?;
    export::save_coauthors(&client, &author, &cli.output_file).await?;

    info!("Finished.");
    Ok(())
}

/// Map `-v` occurrences to a log level (default: warn).
fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();
}
