use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use secdl::config::Config;
use secdl::edgar::{query, TickerTable};
use secdl::transport::HttpTransport;
use secdl::{storage, Downloader, FilingRecord, Identity};

mod cli;

use cli::{Cli, Commands, OutputFormat};

#[tokio::main]
async fn main() -> Result<()> {
    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "secdl=info");
    }

    // Initialize logging to both console and file
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let file_appender = tracing_appender::rolling::never(".", "secdl.log");

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(EnvFilter::from_default_env()),
        )
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?.with_identity(cli.company_name.clone(), cli.email.clone());

    if let Err(e) = run(cli.command, &config).await {
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Metadata { query: raw, all, format } => {
            let mut request = query::parse_any(&raw)?;
            if all {
                request = request.unbounded();
            }

            let (transport, identity) = client(config)?;
            let downloader = Downloader::connect(transport, identity).await?;
            let records = downloader.filings(&request).await?;
            print_records(&records, format)?;
        }

        Commands::Url { accession_number } => {
            let (transport, identity) = client(config)?;
            let downloader = Downloader::new(transport, identity, TickerTable::default());
            println!("{}", downloader.primary_doc_url(&accession_number).await?);
        }

        Commands::Html { accession_number } => {
            let (transport, identity) = client(config)?;
            let downloader = Downloader::new(transport, identity, TickerTable::default());
            println!("{}", downloader.primary_doc_html(&accession_number).await?);
        }

        Commands::Download { query: raw, output } => {
            let output = match output {
                Some(dir) => dir,
                None => {
                    config.validate()?;
                    config.download_dir.clone()
                }
            };
            let request = query::parse_any(&raw)?;
            info!("Starting download for: {}", request.identifier());

            let (transport, identity) = client(config)?;
            let downloader = Downloader::connect(transport, identity).await?;
            let records = downloader.filings(&request).await?;
            for record in &records {
                let body = downloader.fetch_document(&record.primary_doc_url).await?;
                let path = storage::save_document(&output, record, &body)?;
                println!("{}", path.display());
            }
            info!("Successfully downloaded {} documents", records.len());
        }

        Commands::Staged { dir } => {
            let dir = dir.unwrap_or_else(|| config.download_dir.clone());
            let documents = storage::read_documents(&dir, storage::HTML_EXTENSIONS)
                .with_context(|| format!("Failed to read staged documents from {}", dir.display()))?;
            println!("Found {} staged documents in {}:", documents.len(), dir.display());
            for (path, text) in &documents {
                println!("{} ({} chars)", path.display(), text.chars().count());
            }
        }
    }

    Ok(())
}

/// HTTP transport and identity for commands that talk to EDGAR.
fn client(config: &Config) -> Result<(HttpTransport, Identity)> {
    let identity = config.identity()?;
    let transport = HttpTransport::from_config(config).context("Failed to build HTTP client")?;
    Ok((transport, identity))
}

fn print_records(records: &[FilingRecord], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("Found {} filings:", records.len());
            for record in records {
                println!(
                    "{} - {} ({}) - {} - {}",
                    record.filing_date,
                    record.company_name,
                    record.form_type,
                    record.accession_number,
                    record.primary_doc_url
                );
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(records)?),
        OutputFormat::Csv => storage::export_csv(records, std::io::stdout())?,
    }
    Ok(())
}
