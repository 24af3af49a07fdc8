use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;

use crate::edgar::EdgarApi;
use crate::errors::{FilingError, Result};

/// A listing of the company's shares on one exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerRecord {
    pub symbol: String,
    pub exchange: String,
}

/// One resolved filing, as produced by the collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilingRecord {
    pub accession_number: String,
    pub form_type: String,
    pub primary_doc_url: String,
    pub items: String,
    pub primary_doc_description: String,
    pub filing_date: String,
    pub report_date: String,
    pub cik: String,
    pub company_name: String,
    pub tickers: Vec<TickerRecord>,
}

impl FilingRecord {
    /// Filing date as a calendar date, if EDGAR supplied one.
    pub fn filing_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.filing_date, "%Y-%m-%d").ok()
    }

    /// URL of the complete submission text file (all documents concatenated).
    pub fn full_submission_url(&self) -> Result<String> {
        let accession = AccessionNumber::parse(&self.accession_number)?;
        Ok(EdgarApi::archive_url(
            &self.cik,
            &accession,
            &format!("{}.txt", accession),
        ))
    }

    /// Directory label used when staging files: first ticker, else the CIK.
    pub fn label(&self) -> &str {
        self.tickers
            .first()
            .map(|t| t.symbol.as_str())
            .unwrap_or(&self.cik)
    }
}

/// A caller's request for filings. The entity identifier is a ticker or
/// a CIK and is resolved only when the request is executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilingQuery {
    ByCount {
        identifier: String,
        form_type: String,
        /// `None` asks for every available filing.
        limit: Option<NonZeroUsize>,
    },
    ByAccession {
        identifier: String,
        accession_number: String,
    },
}

impl FilingQuery {
    pub fn by_count(identifier: impl Into<String>, form_type: &str, limit: Option<NonZeroUsize>) -> Self {
        FilingQuery::ByCount {
            identifier: identifier.into(),
            form_type: form_type.to_uppercase(),
            limit,
        }
    }

    pub fn by_accession(identifier: impl Into<String>, accession_number: impl Into<String>) -> Self {
        FilingQuery::ByAccession {
            identifier: identifier.into(),
            accession_number: accession_number.into(),
        }
    }

    pub fn identifier(&self) -> &str {
        match self {
            FilingQuery::ByCount { identifier, .. } => identifier,
            FilingQuery::ByAccession { identifier, .. } => identifier,
        }
    }

    /// Same request with the limit removed.
    pub fn unbounded(self) -> Self {
        match self {
            FilingQuery::ByCount { identifier, form_type, .. } => FilingQuery::ByCount {
                identifier,
                form_type,
                limit: None,
            },
            other => other,
        }
    }
}

/// Company-level context captured from the first submissions page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntity {
    pub cik: String,
    pub canonical_name: String,
    pub tickers: Vec<TickerRecord>,
}

/// Canonical `DDDDDDDDDD-DD-DDDDDD` accession number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccessionNumber(String);

impl AccessionNumber {
    /// Accepts the dashed 20-character form or the bare 18-digit form.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());

        let canonical = match trimmed.len() {
            18 if digits_only(trimmed) => format!(
                "{}-{}-{}",
                &trimmed[..10],
                &trimmed[10..12],
                &trimmed[12..]
            ),
            20 => {
                let parts: Vec<&str> = trimmed.split('-').collect();
                match parts.as_slice() {
                    [filer, year, seq]
                        if filer.len() == 10
                            && year.len() == 2
                            && seq.len() == 6
                            && digits_only(filer)
                            && digits_only(year)
                            && digits_only(seq) =>
                    {
                        trimmed.to_string()
                    }
                    _ => return Err(FilingError::InvalidAccessionNumber(raw.to_string())),
                }
            }
            _ => return Err(FilingError::InvalidAccessionNumber(raw.to_string())),
        };

        Ok(AccessionNumber(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 18-digit form used in archive paths.
    pub fn without_dashes(&self) -> String {
        self.0.replace('-', "")
    }

    /// The 10-digit CIK of the entity that submitted the filing.
    pub fn filer_cik(&self) -> &str {
        &self.0[..10]
    }
}

impl fmt::Display for AccessionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who is making requests. EDGAR requires this on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    company_name: String,
    email: String,
}

impl Identity {
    pub fn new(company_name: impl Into<String>, email: impl Into<String>) -> Result<Self> {
        let company_name = company_name.into().trim().to_string();
        let email = email.into().trim().to_string();
        if company_name.is_empty() || email.is_empty() {
            return Err(FilingError::MissingIdentity);
        }
        Ok(Identity { company_name, email })
    }

    /// Value sent in the `User-Agent` header.
    pub fn user_agent(&self) -> String {
        format!("{} {}", self.company_name, self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accession_number_canonicalization() {
        let dashed = AccessionNumber::parse("0000320193-23-000106").unwrap();
        let bare = AccessionNumber::parse("000032019323000106").unwrap();
        assert_eq!(dashed, bare);
        assert_eq!(bare.as_str(), "0000320193-23-000106");
        assert_eq!(bare.without_dashes(), "000032019323000106");
        assert_eq!(bare.filer_cik(), "0000320193");
    }

    #[test]
    fn test_accession_number_rejects_bad_shapes() {
        for raw in ["", "0000320193-23-00010", "00003201932300010X", "000032019-323-000106", "AAPL"] {
            match AccessionNumber::parse(raw) {
                Err(FilingError::InvalidAccessionNumber(bad)) => assert_eq!(bad, raw),
                other => panic!("expected InvalidAccessionNumber for {:?}, got {:?}", raw, other),
            }
        }
    }

    #[test]
    fn test_record_urls_and_label() {
        let mut record = FilingRecord {
            accession_number: "0000320193-23-000106".to_string(),
            form_type: "10-K".to_string(),
            primary_doc_url: String::new(),
            items: String::new(),
            primary_doc_description: String::new(),
            filing_date: "2023-11-03".to_string(),
            report_date: String::new(),
            cik: "0000320193".to_string(),
            company_name: "Apple Inc.".to_string(),
            tickers: Vec::new(),
        };
        assert_eq!(
            record.full_submission_url().unwrap(),
            "https://www.sec.gov/Archives/edgar/data/320193/000032019323000106/0000320193-23-000106.txt"
        );
        assert_eq!(record.filing_date(), NaiveDate::from_ymd_opt(2023, 11, 3));
        assert_eq!(record.label(), "0000320193");
        record.tickers.push(TickerRecord {
            symbol: "AAPL".to_string(),
            exchange: "Nasdaq".to_string(),
        });
        assert_eq!(record.label(), "AAPL");
    }

    #[test]
    fn test_identity_requires_both_parts() {
        assert!(matches!(Identity::new("", "a@b.com"), Err(FilingError::MissingIdentity)));
        assert!(matches!(Identity::new("Acme", "  "), Err(FilingError::MissingIdentity)));
        let identity = Identity::new("Acme Corp", "ops@acme.test").unwrap();
        assert_eq!(identity.user_agent(), "Acme Corp ops@acme.test");
    }

    #[test]
    fn test_unbounded_drops_limit_only_for_count_queries() {
        let query = FilingQuery::by_count("AAPL", "10-k", NonZeroUsize::new(2));
        assert_eq!(
            query.unbounded(),
            FilingQuery::ByCount {
                identifier: "AAPL".to_string(),
                form_type: "10-K".to_string(),
                limit: None,
            }
        );
        let query = FilingQuery::by_accession("AAPL", "0000320193-23-000106");
        assert_eq!(query.clone().unbounded(), query);
    }
}
