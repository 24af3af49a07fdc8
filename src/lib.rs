//! secdl: resolve SEC EDGAR filing requests into filing records and documents

pub mod config;
pub mod downloader;
pub mod edgar;
pub mod errors;
pub mod models;
pub mod storage;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use downloader::Downloader;
pub use errors::{FilingError, Result, TransportError};
pub use models::{AccessionNumber, FilingQuery, FilingRecord, Identity, ResolvedEntity, TickerRecord};
