//! Error types for filing resolution and transport

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FilingError>;

#[derive(Error, Debug)]
pub enum FilingError {
    #[error("Malformed filing query: '{0}'. Expected [LIMIT/]TICKER_OR_CIK[/FORM]")]
    MalformedQuery(String),

    #[error("Ticker or CIK '{0}' is invalid and cannot be mapped to a CIK")]
    UnknownIdentifier(String),

    #[error("Invalid accession number: '{0}'")]
    InvalidAccessionNumber(String),

    #[error("'{0}' forms are not supported")]
    UnsupportedFormType(String),

    #[error("Could not find the requested filings: {0}")]
    FilingNotFound(String),

    #[error("Found more than {limit} filings, actual count is {found}: {context}")]
    ResultOverflow {
        limit: usize,
        found: usize,
        context: String,
    },

    #[error("Refusing to fetch '{0}': host is not an SEC EDGAR host")]
    UntrustedUrl(String),

    #[error("Identifying header requires both a company name and an email address")]
    MissingIdentity,

    #[error("Submissions page at {url} does not match the expected schema: {source}")]
    MalformedPage {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Failures raised by the HTTP collaborator, passed through unchanged.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("EDGAR returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request to {0} has no identifying User-Agent")]
    MissingIdentity(String),

    #[error("Failed to decode JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
