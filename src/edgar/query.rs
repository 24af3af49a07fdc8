//! String adapter for filing requests
//!
//! Callers pick a [`FilingQuery`] variant; this module is the only place that
//! turns free-form text such as `2/AAPL/10-K` or `AAPL/0000320193-23-000106`
//! into one.

use regex::Regex;
use std::num::NonZeroUsize;
use std::sync::OnceLock;

use crate::edgar::EdgarApi;
use crate::errors::{FilingError, Result};
use crate::models::FilingQuery;

fn count_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:(\d+)/)?([^/]+)(?:/([^/]+))?$").expect("count query pattern is valid")
    })
}

fn accession_reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\b([A-Za-z0-9.]+)/(\d{10}-?\d{2}-?\d{6})\b")
            .expect("accession reference pattern is valid")
    })
}

/// Parses `[LIMIT/]IDENTIFIER[/FORM]` into a count query.
///
/// `LIMIT` defaults to 1 and `FORM` to `10-Q`; the form is uppercased.
pub fn parse(raw: &str) -> Result<FilingQuery> {
    let trimmed = raw.trim();
    let captures = count_pattern()
        .captures(trimmed)
        .ok_or_else(|| FilingError::MalformedQuery(raw.to_string()))?;

    let limit = match captures.get(1) {
        Some(segment) => segment
            .as_str()
            .parse::<usize>()
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or_else(|| FilingError::MalformedQuery(raw.to_string()))?,
        None => NonZeroUsize::MIN,
    };

    let identifier = captures
        .get(2)
        .map(|m| m.as_str().trim())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| FilingError::MalformedQuery(raw.to_string()))?;

    let form_type = captures
        .get(3)
        .map(|m| m.as_str())
        .unwrap_or(EdgarApi::DEFAULT_FORM_TYPE);

    Ok(FilingQuery::by_count(identifier, form_type, Some(limit)))
}

/// Finds an `IDENTIFIER/ACCESSION` reference anywhere in `raw`.
pub fn try_parse_accession_reference(raw: &str) -> Option<(String, String)> {
    let captures = accession_reference_pattern().captures(raw.trim())?;
    Some((captures[1].to_string(), captures[2].to_string()))
}

/// Accepts either shape: a direct accession reference wins, otherwise the
/// text must be a count query.
pub fn parse_any(raw: &str) -> Result<FilingQuery> {
    match try_parse_accession_reference(raw) {
        Some((identifier, accession_number)) => {
            Ok(FilingQuery::by_accession(identifier, accession_number))
        }
        None => parse(raw),
    }
}
