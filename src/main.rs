//! kodegen-bookmeta - command line front end for the metadata source
//!
//! `identify` prints one JSON record per line as workers finish; `cover`
//! writes the best matching cover image to a file. Ctrl+C sets the abort
//! signal so in-flight lookups wind down instead of being killed.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use futures::StreamExt;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kodegen_tools_bookmeta::{
    AbortSignal, CatalogConfig, CatalogSource, IdentifyOutcome, IdentifyRequest,
};

#[derive(Parser, Debug)]
#[command(name = "kodegen-bookmeta")]
#[command(about = "Look up book metadata and covers in an online catalog")]
#[command(version)]
struct Cli {
    /// Catalog storefront to search
    #[arg(long, global = true, env = "BOOKMETA_BASE_URL")]
    base_url: Option<String>,

    /// Network timeout in seconds
    #[arg(long, global = true, default_value_t = 30, env = "BOOKMETA_TIMEOUT")]
    timeout: u64,

    /// Maximum number of candidate editions to fetch
    #[arg(long, global = true, env = "BOOKMETA_MAX_EDITIONS")]
    max_editions: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print metadata records as JSON lines
    Identify(BookArgs),
    /// Download the best matching cover image
    Cover {
        #[command(flatten)]
        book: BookArgs,

        /// Where to write the image
        #[arg(short, long, default_value = "cover.jpg")]
        output: PathBuf,
    },
}

#[derive(Args, Debug)]
struct BookArgs {
    /// Book title
    #[arg(short, long)]
    title: Option<String>,

    /// Author name; repeat for several authors
    #[arg(short, long = "author")]
    authors: Vec<String>,

    /// Known identifier as `type:value`, e.g. `isbn:9787536692930`
    #[arg(short, long = "identifier", value_parser = parse_identifier)]
    identifiers: Vec<(String, String)>,
}

impl BookArgs {
    fn into_request(self) -> IdentifyRequest {
        IdentifyRequest {
            title: self.title,
            authors: self.authors,
            identifiers: self.identifiers.into_iter().collect::<BTreeMap<_, _>>(),
        }
    }
}

fn parse_identifier(raw: &str) -> Result<(String, String), String> {
    match raw.split_once(':') {
        Some((key, value)) if !key.trim().is_empty() && !value.trim().is_empty() => {
            Ok((key.trim().to_lowercase(), value.trim().to_string()))
        }
        _ => Err(format!("expected type:value, got '{raw}'")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kodegen_tools_bookmeta=info,kodegen_bookmeta=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut builder = CatalogConfig::builder().default_timeout(Duration::from_secs(cli.timeout));
    if let Some(base_url) = &cli.base_url {
        builder = builder.base_url(base_url.as_str());
    }
    if let Some(max) = cli.max_editions {
        builder = builder.max_editions(max);
    }
    let config = builder.build().context("Invalid catalog configuration")?;
    let timeout = config.default_timeout();
    let source = CatalogSource::new(config).context("Failed to create HTTP client")?;

    let abort = AbortSignal::new();
    let on_ctrl_c = abort.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, aborting lookup");
            on_ctrl_c.set();
        }
    });

    match cli.command {
        Command::Identify(book) => {
            let request = book.into_request();
            let (mut records, handle) = source.identify_stream(request, abort, timeout);
            let mut printed = 0usize;
            while let Some(record) = records.next().await {
                println!("{}", serde_json::to_string(&record)?);
                printed += 1;
            }
            match handle.await.context("Identify task failed")? {
                Ok(IdentifyOutcome::NoMatches) => info!("No matches found"),
                Ok(IdentifyOutcome::Aborted) => info!("Aborted after {printed} records"),
                Ok(IdentifyOutcome::Matched { workers }) => {
                    info!("{printed} records from {workers} candidates");
                }
                Err(e) => bail!("{e}"),
            }
        }
        Command::Cover { book, output } => {
            let request = book.into_request();
            match source.download_cover(&request, &abort, timeout).await {
                Ok(Some(bytes)) => {
                    tokio::fs::write(&output, &bytes)
                        .await
                        .with_context(|| format!("Failed to write {}", output.display()))?;
                    info!("Wrote {} bytes to {}", bytes.len(), output.display());
                }
                Ok(None) => bail!("No cover found"),
                Err(e) => bail!("{e}"),
            }
        }
    }
    Ok(())
}
