//! Filters index entries and gathers exactly the requested number of filings

use std::num::NonZeroUsize;
use tracing::{debug, info};

use crate::edgar::documents::resolve_primary_document_url;
use crate::edgar::submissions::{FilingIndexEntry, SubmissionPages};
use crate::edgar::types::split_amendment;
use crate::errors::{FilingError, Result};
use crate::models::FilingRecord;
use crate::transport::Transport;

/// Which index entries a walk should keep. Amendments are always dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilingFilter {
    pub form_type: Option<String>,
    pub accession_number: Option<String>,
}

impl FilingFilter {
    pub fn form_type(form_type: impl Into<String>) -> Self {
        Self {
            form_type: Some(form_type.into()),
            accession_number: None,
        }
    }

    pub fn accession_number(accession_number: impl Into<String>) -> Self {
        Self {
            form_type: None,
            accession_number: Some(accession_number.into()),
        }
    }

    /// Returns the normalized form type when `entry` is kept.
    pub fn accept<'e>(&self, entry: &'e FilingIndexEntry) -> Option<&'e str> {
        let (form, is_amendment) = split_amendment(&entry.form);
        if is_amendment {
            return None;
        }
        if self.form_type.as_deref().is_some_and(|wanted| wanted != form) {
            return None;
        }
        if self
            .accession_number
            .as_deref()
            .is_some_and(|wanted| wanted != entry.accession_number)
        {
            return None;
        }
        Some(form)
    }

    /// `"<accession or identifier>[ of type <FORM>]"`, used in error messages.
    pub fn describe(&self, identifier: &str) -> String {
        let subject = self.accession_number.as_deref().unwrap_or(identifier);
        match &self.form_type {
            Some(form) => format!("{} of type {}", subject, form),
            None => subject.to_string(),
        }
    }
}

/// Pulls entries from `pages` until `limit` matches are found or the index
/// is exhausted. No page beyond the one holding the last needed match is
/// requested. `None` collects every match.
///
/// A bounded request is all-or-nothing: fewer matches than `limit` fails
/// with `FilingNotFound`, as does an unbounded walk that matched nothing.
pub async fn collect<T: Transport + ?Sized>(
    pages: &mut SubmissionPages<'_, T>,
    filter: &FilingFilter,
    limit: Option<NonZeroUsize>,
    identifier: &str,
) -> Result<Vec<FilingRecord>> {
    let mut found = Vec::new();

    while limit.map_or(true, |n| found.len() < n.get()) {
        let Some(entry) = pages.next_entry().await? else {
            break;
        };
        let Some(form_type) = filter.accept(&entry) else {
            continue;
        };

        debug!("Matched {} {} filed {}", form_type, entry.accession_number, entry.filing_date);
        let record = build_record(pages, form_type, &entry)?;
        found.push(record);
    }

    let context = filter.describe(identifier);
    if found.is_empty() {
        return Err(FilingError::FilingNotFound(context));
    }
    if let Some(limit) = limit.map(NonZeroUsize::get) {
        if found.len() < limit {
            return Err(FilingError::FilingNotFound(format!(
                "{} (found {} of {})",
                context,
                found.len(),
                limit
            )));
        }
        if found.len() > limit {
            return Err(FilingError::ResultOverflow {
                limit,
                found: found.len(),
                context,
            });
        }
    }

    info!(
        "Collected {} filings for {} after {} page(s)",
        found.len(),
        context,
        pages.pages_fetched()
    );
    Ok(found)
}

fn build_record<T: Transport + ?Sized>(
    pages: &SubmissionPages<'_, T>,
    form_type: &str,
    entry: &FilingIndexEntry,
) -> Result<FilingRecord> {
    let entity = pages.entity();
    Ok(FilingRecord {
        primary_doc_url: resolve_primary_document_url(
            pages.cik(),
            &entry.accession_number,
            &entry.primary_document,
        )?,
        accession_number: entry.accession_number.clone(),
        form_type: form_type.to_string(),
        items: entry.items.clone(),
        primary_doc_description: entry.primary_doc_description.clone(),
        filing_date: entry.filing_date.clone(),
        report_date: entry.report_date.clone(),
        cik: entity.cik.clone(),
        company_name: entity.canonical_name.clone(),
        tickers: entity.tickers.clone(),
    })
}
