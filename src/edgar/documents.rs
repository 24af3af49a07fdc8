//! Primary document location and retrieval

use std::num::NonZeroUsize;
use tracing::{debug, info};
use url::Url;

use crate::edgar::collector::{collect, FilingFilter};
use crate::edgar::submissions::SubmissionPages;
use crate::edgar::EdgarApi;
use crate::errors::{FilingError, Result};
use crate::models::{AccessionNumber, Identity};
use crate::transport::Transport;

/// Archive URL of a filing's primary document. Pure; no request is made.
pub fn resolve_primary_document_url(cik: &str, accession_number: &str, primary_document: &str) -> Result<String> {
    let accession = AccessionNumber::parse(accession_number)?;
    Ok(EdgarApi::archive_url(cik, &accession, primary_document))
}

/// Rejects anything that is not an https URL on `sec.gov` or a subdomain of it.
pub fn ensure_trusted_url(raw: &str) -> Result<Url> {
    let untrusted = || FilingError::UntrustedUrl(raw.to_string());
    let url = Url::parse(raw).map_err(|_| untrusted())?;
    if url.scheme() != "https" {
        return Err(untrusted());
    }

    let host = url.host_str().ok_or_else(untrusted)?.to_ascii_lowercase();
    let domain = EdgarApi::TRUSTED_DOMAIN;
    let on_domain = host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'));
    if !on_domain {
        return Err(untrusted());
    }
    Ok(url)
}

/// Downloads a document from the EDGAR archive.
pub async fn fetch_document<T: Transport + ?Sized>(transport: &T, url: &str, identity: &Identity) -> Result<Vec<u8>> {
    let url = ensure_trusted_url(url)?;
    debug!("Downloading document: {}", url);
    let body = transport.fetch_bytes(url.as_str(), identity).await?;
    debug!("Downloaded {} bytes from {}", body.len(), url);
    Ok(body)
}

/// Finds the primary document of a filing known only by accession number.
///
/// The walk runs over the index of the filer CIK embedded in the accession
/// number, which is the reporting company unless a filing agent submitted it.
pub async fn find_primary_document_url_by_accession<T: Transport + ?Sized>(
    transport: &T,
    accession_number: &str,
    identity: &Identity,
) -> Result<String> {
    let accession = AccessionNumber::parse(accession_number)?;
    let cik = accession.filer_cik();
    info!("Looking up primary document for {} under CIK {}", accession, cik);

    let mut pages = SubmissionPages::open(transport, identity, cik).await?;
    let filter = FilingFilter::accession_number(accession.as_str());
    let mut records = collect(&mut pages, &filter, Some(NonZeroUsize::MIN), cik).await?;

    match records.pop() {
        Some(record) => Ok(record.primary_doc_url),
        None => Err(FilingError::FilingNotFound(accession.to_string())),
    }
}
