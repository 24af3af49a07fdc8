//! Executes filing requests: resolve the entity, walk its index, collect matches

use std::num::NonZeroUsize;
use tracing::info;

use crate::edgar::cik::{resolve_cik, TickerTable};
use crate::edgar::collector::{collect, FilingFilter};
use crate::edgar::submissions::SubmissionPages;
use crate::edgar::types::is_supported_form;
use crate::errors::{FilingError, Result};
use crate::models::{AccessionNumber, FilingQuery, FilingRecord, Identity};
use crate::transport::Transport;

/// Latest `limit` non-amended filings of `form_type`, newest first.
pub async fn latest_filings_metadata<T: Transport + ?Sized>(
    transport: &T,
    identity: &Identity,
    table: &TickerTable,
    identifier: &str,
    form_type: &str,
    limit: Option<NonZeroUsize>,
) -> Result<Vec<FilingRecord>> {
    let cik = resolve_cik(identifier, table)?;
    let form_type = form_type.trim().to_uppercase();
    if !is_supported_form(&form_type) {
        return Err(FilingError::UnsupportedFormType(form_type));
    }

    info!(
        "Requesting {} {} filings for {} (CIK {})",
        limit.map_or_else(|| "all".to_string(), |n| n.to_string()),
        form_type,
        identifier,
        cik
    );

    let mut pages = SubmissionPages::open(transport, identity, &cik).await?;
    collect(&mut pages, &FilingFilter::form_type(form_type), limit, identifier).await
}

/// The single filing with `accession_number`, looked up in `identifier`'s index.
pub async fn filing_metadata<T: Transport + ?Sized>(
    transport: &T,
    identity: &Identity,
    table: &TickerTable,
    identifier: &str,
    accession_number: &str,
) -> Result<FilingRecord> {
    let accession = AccessionNumber::parse(accession_number)?;
    let cik = resolve_cik(identifier, table)?;
    info!("Requesting filing {} for {} (CIK {})", accession, identifier, cik);

    let mut pages = SubmissionPages::open(transport, identity, &cik).await?;
    let filter = FilingFilter::accession_number(accession.as_str());
    let mut records = collect(&mut pages, &filter, Some(NonZeroUsize::MIN), identifier).await?;

    match records.pop() {
        Some(record) => Ok(record),
        None => Err(FilingError::FilingNotFound(accession.to_string())),
    }
}

/// Runs either request variant.
pub async fn resolve_filings<T: Transport + ?Sized>(
    transport: &T,
    identity: &Identity,
    table: &TickerTable,
    query: &FilingQuery,
) -> Result<Vec<FilingRecord>> {
    match query {
        FilingQuery::ByCount {
            identifier,
            form_type,
            limit,
        } => latest_filings_metadata(transport, identity, table, identifier, form_type, *limit).await,
        FilingQuery::ByAccession {
            identifier,
            accession_number,
        } => {
            let record = filing_metadata(transport, identity, table, identifier, accession_number).await?;
            Ok(vec![record])
        }
    }
}
