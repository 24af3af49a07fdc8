use std::num::NonZeroUsize;
use tracing::{info, warn};

use crate::edgar::{self, TickerTable};
use crate::errors::{FilingError, Result};
use crate::models::{FilingQuery, FilingRecord, Identity};
use crate::transport::Transport;

/// Entry point tying together the transport, the caller's identity and the
/// symbol table loaded at startup.
pub struct Downloader<T: Transport> {
    transport: T,
    identity: Identity,
    tickers: TickerTable,
}

impl<T: Transport> Downloader<T> {
    pub fn new(transport: T, identity: Identity, tickers: TickerTable) -> Self {
        Self {
            transport,
            identity,
            tickers,
        }
    }

    /// Loads the ticker table through `transport` before building the downloader.
    pub async fn connect(transport: T, identity: Identity) -> Result<Self> {
        let tickers = TickerTable::fetch(&transport, &identity).await?;
        Ok(Self::new(transport, identity, tickers))
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub async fn filings(&self, query: &FilingQuery) -> Result<Vec<FilingRecord>> {
        edgar::resolve_filings(&self.transport, &self.identity, &self.tickers, query).await
    }

    pub async fn primary_doc_url(&self, accession_number: &str) -> Result<String> {
        edgar::find_primary_document_url_by_accession(&self.transport, accession_number, &self.identity).await
    }

    /// Primary document of a filing as text; invalid UTF-8 is replaced.
    pub async fn primary_doc_html(&self, accession_number: &str) -> Result<String> {
        let url = self.primary_doc_url(accession_number).await?;
        let body = self.fetch_document(&url).await?;
        Ok(decode_lossy(body))
    }

    pub async fn fetch_document(&self, url: &str) -> Result<Vec<u8>> {
        edgar::fetch_document(&self.transport, url, &self.identity).await
    }

    pub async fn latest_html(&self, form_type: &str, identifier: &str) -> Result<String> {
        let documents = self.latest_n_html(form_type, identifier, NonZeroUsize::MIN).await?;
        // A bounded collect never yields an empty list; this keeps the
        // function total without indexing into `documents`.
        documents
            .into_iter()
            .next()
            .ok_or_else(|| FilingError::FilingNotFound(format!("{} of type {}", identifier, form_type)))
    }

    /// Primary documents of the latest `n` filings, newest first.
    pub async fn latest_n_html(&self, form_type: &str, identifier: &str, n: NonZeroUsize) -> Result<Vec<String>> {
        let query = FilingQuery::by_count(identifier, form_type, Some(n));
        let records = self.filings(&query).await?;

        let mut documents = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            info!(
                "Downloading document {}/{}: {} {} ({})",
                index + 1,
                records.len(),
                record.form_type,
                record.accession_number,
                record.filing_date
            );
            let body = self.fetch_document(&record.primary_doc_url).await?;
            documents.push(decode_lossy(body));
        }
        Ok(documents)
    }
}

fn decode_lossy(body: Vec<u8>) -> String {
    match String::from_utf8(body) {
        Ok(text) => text,
        Err(e) => {
            warn!("Document is not valid UTF-8, replacing invalid sequences");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}
