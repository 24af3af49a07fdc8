//! Submissions index: page schema and the forward-only page walk
//!
//! EDGAR serves an entity's history as a first page
//! (`CIK##########.json`) holding company details, a `recent` batch of
//! filings and a queue of older page files. Each older page is a flat object
//! with the same parallel-array columns. Both shapes are parsed into
//! [`FilingIndexEntry`] rows so nothing downstream sees the difference.

use serde::Deserialize;
use std::collections::VecDeque;
use tracing::{debug, info};

use crate::edgar::EdgarApi;
use crate::errors::{FilingError, Result};
use crate::models::{Identity, ResolvedEntity, TickerRecord};
use crate::transport::Transport;

/// One position across the index's parallel arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingIndexEntry {
    pub accession_number: String,
    pub primary_document: String,
    pub filing_date: String,
    pub report_date: String,
    pub primary_doc_description: String,
    pub items: String,
    /// Form type as published, possibly with an amendment suffix
    pub form: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilingColumns {
    accession_number: Vec<String>,
    primary_document: Vec<String>,
    filing_date: Vec<String>,
    report_date: Vec<String>,
    primary_doc_description: Vec<String>,
    items: Vec<String>,
    form: Vec<String>,
}

impl FilingColumns {
    fn into_entries(self) -> Vec<FilingIndexEntry> {
        self.accession_number
            .into_iter()
            .zip(self.primary_document)
            .zip(self.filing_date)
            .zip(self.report_date)
            .zip(self.primary_doc_description)
            .zip(self.items)
            .zip(self.form)
            .map(
                |((((((accession_number, primary_document), filing_date), report_date), primary_doc_description), items), form)| {
                    FilingIndexEntry {
                        accession_number,
                        primary_document,
                        filing_date,
                        report_date,
                        primary_doc_description,
                        items,
                        form,
                    }
                },
            )
            .collect()
    }
}

/// EDGAR has served the CIK both as a string and as a number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CikField {
    Text(String),
    Number(u64),
}

impl CikField {
    fn padded(&self) -> String {
        match self {
            CikField::Text(s) => format!("{:0>10}", s.trim()),
            CikField::Number(n) => format!("{:0>10}", n),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SubmissionsHead {
    cik: CikField,
    name: String,
    #[serde(default)]
    tickers: Vec<String>,
    #[serde(default)]
    exchanges: Vec<Option<String>>,
    filings: FilingsSection,
}

#[derive(Debug, Deserialize)]
struct FilingsSection {
    recent: FilingColumns,
    #[serde(default)]
    files: Vec<PageFile>,
}

#[derive(Debug, Deserialize)]
struct PageFile {
    name: String,
}

/// Contents of the first submissions page.
#[derive(Debug)]
pub struct FirstPage {
    pub entity: ResolvedEntity,
    pub entries: Vec<FilingIndexEntry>,
    /// Older page file names, newest first
    pub older_pages: VecDeque<String>,
}

pub fn parse_first_page(page: serde_json::Value) -> std::result::Result<FirstPage, serde_json::Error> {
    let head: SubmissionsHead = serde_json::from_value(page)?;

    let tickers = head
        .tickers
        .into_iter()
        .zip(head.exchanges)
        .map(|(symbol, exchange)| TickerRecord {
            symbol,
            exchange: exchange.unwrap_or_default(),
        })
        .collect();

    Ok(FirstPage {
        entity: ResolvedEntity {
            cik: head.cik.padded(),
            canonical_name: head.name,
            tickers,
        },
        entries: head.filings.recent.into_entries(),
        older_pages: head.filings.files.into_iter().map(|f| f.name).collect(),
    })
}

pub fn parse_page_file(page: serde_json::Value) -> std::result::Result<Vec<FilingIndexEntry>, serde_json::Error> {
    let columns: FilingColumns = serde_json::from_value(page)?;
    Ok(columns.into_entries())
}

/// Lazy, forward-only cursor over one entity's filing index.
///
/// Opening the cursor reads the first page; older pages are fetched only
/// when the buffered batch runs out, so a consumer that stops pulling never
/// causes another request.
pub struct SubmissionPages<'a, T: Transport + ?Sized> {
    transport: &'a T,
    identity: &'a Identity,
    cik: String,
    entity: ResolvedEntity,
    older_pages: VecDeque<String>,
    batch: std::vec::IntoIter<FilingIndexEntry>,
    pages_fetched: usize,
}

impl<'a, T: Transport + ?Sized> SubmissionPages<'a, T> {
    /// Starts a fresh walk for `cik` by fetching its first page.
    pub async fn open(transport: &'a T, identity: &'a Identity, cik: &str) -> Result<Self> {
        let url = EdgarApi::submissions_url(&EdgarApi::first_page_name(cik));
        debug!("Fetching submissions page: {}", url);
        let page = transport.fetch_json(&url, identity).await?;
        let first = parse_first_page(page).map_err(|source| FilingError::MalformedPage { url, source })?;

        info!(
            "Walking submissions for {} (CIK {}): {} recent filings, {} older pages",
            first.entity.canonical_name,
            first.entity.cik,
            first.entries.len(),
            first.older_pages.len()
        );

        Ok(Self {
            transport,
            identity,
            cik: cik.to_string(),
            entity: first.entity,
            older_pages: first.older_pages,
            batch: first.entries.into_iter(),
            pages_fetched: 1,
        })
    }

    /// CIK the walk was started for.
    pub fn cik(&self) -> &str {
        &self.cik
    }

    /// Company context read from the first page.
    pub fn entity(&self) -> &ResolvedEntity {
        &self.entity
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Next entry in source order, or `None` once every page is consumed.
    pub async fn next_entry(&mut self) -> Result<Option<FilingIndexEntry>> {
        loop {
            if let Some(entry) = self.batch.next() {
                return Ok(Some(entry));
            }

            match self.older_pages.pop_front() {
                Some(page_name) => self.load_page_file(&page_name).await?,
                None => return Ok(None),
            }
        }
    }

    async fn load_page_file(&mut self, page_name: &str) -> Result<()> {
        let url = EdgarApi::submissions_url(page_name);
        debug!("Fetching submissions page: {}", url);
        let page = self.transport.fetch_json(&url, self.identity).await?;
        self.pages_fetched += 1;
        let entries = parse_page_file(page).map_err(|source| FilingError::MalformedPage { url, source })?;

        debug!("Page {} holds {} filings", page_name, entries.len());
        self.batch = entries.into_iter();
        Ok(())
    }
}
