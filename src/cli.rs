use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "secdl")]
#[command(about = "Resolve SEC EDGAR filing requests and download primary documents")]
#[command(version)]
pub struct Cli {
    /// Organization name sent in the User-Agent (overrides SECDL_COMPANY_NAME)
    #[arg(long, global = true)]
    pub company_name: Option<String>,

    /// Contact email sent in the User-Agent (overrides SECDL_EMAIL)
    #[arg(long, global = true)]
    pub email: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show filing metadata for a query such as 2/AAPL/10-K or AAPL/0000320193-23-000106
    Metadata {
        /// [LIMIT/]TICKER_OR_CIK[/FORM] or TICKER_OR_CIK/ACCESSION
        query: String,

        /// Return every matching filing instead of LIMIT
        #[arg(long)]
        all: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Print the primary document URL of a filing
    Url {
        /// Accession number, with or without dashes
        accession_number: String,
    },

    /// Print the primary document of a filing
    Html {
        /// Accession number, with or without dashes
        accession_number: String,
    },

    /// Download primary documents for a query
    Download {
        /// [LIMIT/]TICKER_OR_CIK[/FORM] or TICKER_OR_CIK/ACCESSION
        query: String,

        /// Output directory (defaults to SECDL_DOWNLOAD_DIR or ./downloads)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List HTML documents already downloaded
    Staged {
        /// Download directory to scan (defaults to SECDL_DOWNLOAD_DIR or ./downloads)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_arguments() {
        let cli = Cli::try_parse_from(["secdl", "metadata", "2/AAPL/10-K", "--format", "csv", "--email", "a@b.c"]).unwrap();
        assert_eq!(cli.email.as_deref(), Some("a@b.c"));
        match cli.command {
            Commands::Metadata { query, all, format } => {
                assert_eq!(query, "2/AAPL/10-K");
                assert!(!all);
                assert_eq!(format, OutputFormat::Csv);
            }
            _ => panic!("expected metadata command"),
        }
    }

    #[test]
    fn test_download_defaults() {
        let cli = Cli::try_parse_from(["secdl", "download", "AAPL"]).unwrap();
        match cli.command {
            Commands::Download { query, output } => {
                assert_eq!(query, "AAPL");
                assert!(output.is_none());
            }
            _ => panic!("expected download command"),
        }
    }

    #[test]
    fn test_staged_directory() {
        let cli = Cli::try_parse_from(["secdl", "staged", "--dir", "/tmp/filings"]).unwrap();
        match cli.command {
            Commands::Staged { dir } => assert_eq!(dir, Some(PathBuf::from("/tmp/filings"))),
            _ => panic!("expected staged command"),
        }
    }
}
