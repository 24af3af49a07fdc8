//! SEC EDGAR filing resolution
//!
//! Turns a request such as "the latest two 10-Ks for AAPL" into concrete
//! filing records by resolving the company's CIK, walking its paginated
//! submissions index and collecting matching entries. Documents are then
//! located in, and fetched from, the EDGAR archive.

pub mod types;
pub mod query;
pub mod cik;
pub mod submissions;
pub mod collector;
pub mod documents;
pub mod filings;

pub use types::{EdgarApi, SUPPORTED_FORMS};
pub use cik::{resolve_cik, TickerTable};
pub use submissions::{FilingIndexEntry, SubmissionPages};
pub use collector::{collect, FilingFilter};

// Re-export commonly used functions
pub use documents::{
    ensure_trusted_url,
    fetch_document,
    find_primary_document_url_by_accession,
    resolve_primary_document_url,
};
pub use filings::{filing_metadata, latest_filings_metadata, resolve_filings};
