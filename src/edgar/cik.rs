//! Ticker symbol to CIK resolution

use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::edgar::EdgarApi;
use crate::errors::{FilingError, Result};
use crate::models::Identity;
use crate::transport::Transport;

/// One row of the bulk listing:
/// `{"0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."}, ...}`
#[derive(Debug, Deserialize)]
struct CompanyTicker {
    cik_str: u64,
    ticker: String,
}

/// Read-only symbol table, built once and passed to every resolution.
#[derive(Debug, Clone, Default)]
pub struct TickerTable {
    ciks: HashMap<String, String>,
}

impl TickerTable {
    /// Downloads the bulk ticker listing from EDGAR.
    pub async fn fetch<T: Transport + ?Sized>(transport: &T, identity: &Identity) -> Result<Self> {
        let url = EdgarApi::COMPANY_TICKERS_URL;
        debug!("Fetching company tickers from: {}", url);
        let listing = transport.fetch_json(url, identity).await?;
        let table = Self::from_listing(listing).map_err(|source| FilingError::MalformedPage {
            url: url.to_string(),
            source,
        })?;
        info!("Loaded {} ticker symbols", table.len());
        Ok(table)
    }

    pub fn from_listing(listing: serde_json::Value) -> std::result::Result<Self, serde_json::Error> {
        let rows: HashMap<String, CompanyTicker> = serde_json::from_value(listing)?;
        Ok(rows
            .into_values()
            .map(|row| (row.ticker, format!("{:0>10}", row.cik_str)))
            .collect())
    }

    pub fn get(&self, symbol: &str) -> Option<&str> {
        self.ciks.get(&symbol.to_uppercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ciks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ciks.is_empty()
    }
}

impl<S: AsRef<str>, C: Into<String>> FromIterator<(S, C)> for TickerTable {
    fn from_iter<I: IntoIterator<Item = (S, C)>>(iter: I) -> Self {
        TickerTable {
            ciks: iter
                .into_iter()
                .map(|(symbol, cik)| (symbol.as_ref().to_uppercase(), cik.into()))
                .collect(),
        }
    }
}

/// Resolves a ticker or CIK to a zero-padded 10-digit CIK.
pub fn resolve_cik(identifier: &str, table: &TickerTable) -> Result<String> {
    let normalized = identifier.trim().to_uppercase();
    if normalized.is_empty() {
        return Err(FilingError::UnknownIdentifier(identifier.to_string()));
    }

    if normalized.chars().all(|c| c.is_ascii_digit()) {
        if normalized.len() > EdgarApi::CIK_LENGTH {
            return Err(FilingError::UnknownIdentifier(identifier.to_string()));
        }
        return Ok(format!("{:0>width$}", normalized, width = EdgarApi::CIK_LENGTH));
    }

    table
        .get(&normalized)
        .map(str::to_string)
        .ok_or_else(|| FilingError::UnknownIdentifier(identifier.to_string()))
}
