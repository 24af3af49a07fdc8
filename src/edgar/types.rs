//! EDGAR endpoints, URL templates and form-type constants

use crate::models::AccessionNumber;

/// EDGAR API endpoints and constants
pub struct EdgarApi;

impl EdgarApi {
    /// Per-entity submissions index (first page and older page files)
    pub const SUBMISSIONS_BASE_URL: &'static str = "https://data.sec.gov/submissions";
    /// Filing archive root
    pub const ARCHIVES_BASE_URL: &'static str = "https://www.sec.gov/Archives/edgar/data";
    /// Bulk ticker-to-CIK listing
    pub const COMPANY_TICKERS_URL: &'static str = "https://www.sec.gov/files/company_tickers.json";
    /// Registrable domain every outbound request must stay within
    pub const TRUSTED_DOMAIN: &'static str = "sec.gov";
    /// Width of a canonical, zero-padded CIK
    pub const CIK_LENGTH: usize = 10;
    /// Marker appended to the form type of an amended filing
    pub const AMENDMENT_SUFFIX: &'static str = "/A";
    /// Form requested when a query does not name one
    pub const DEFAULT_FORM_TYPE: &'static str = "10-Q";

    /// Name of the first submissions page for a CIK.
    pub fn first_page_name(cik: &str) -> String {
        format!("CIK{}.json", cik)
    }

    pub fn submissions_url(page_name: &str) -> String {
        format!("{}/{}", Self::SUBMISSIONS_BASE_URL, page_name)
    }

    /// Archive path of one document inside a filing. Archive paths use the
    /// CIK without its zero padding.
    pub fn archive_url(cik: &str, accession: &AccessionNumber, document: &str) -> String {
        let unpadded = cik.trim_start_matches('0');
        let unpadded = if unpadded.is_empty() { "0" } else { unpadded };
        format!(
            "{}/{}/{}/{}",
            Self::ARCHIVES_BASE_URL,
            unpadded,
            accession.without_dashes(),
            document
        )
    }
}

/// Form types EDGAR publishes and this crate accepts in count queries.
pub const SUPPORTED_FORMS: &[&str] = &[
    "1-A", "1-A POS", "1-K", "1-SA", "1-U", "10-12B", "10-12G", "10-D", "10-K",
    "10-K405", "10-KT", "10-Q", "10-QT", "11-K", "13F-HR", "13F-NT", "144", "15-12B",
    "15-12G", "15-15D", "18-K", "20-F", "25", "25-NSE", "3", "4", "40-F", "424B1",
    "424B2", "424B3", "424B4", "424B5", "424B7", "424B8", "5", "6-K", "8-A12B",
    "8-A12G", "8-K", "8-K12B", "8-K12G3", "ARS", "CORRESP", "D", "DEF 14A", "DEF 14C",
    "DEFA14A", "DEFM14A", "DFAN14A", "EFFECT", "F-1", "F-3", "F-4", "F-6", "FWP",
    "N-1A", "N-2", "N-CEN", "N-CSR", "N-CSRS", "N-PORT-P", "N-PX", "N-Q", "NT 10-K",
    "NT 10-Q", "NT 20-F", "POS AM", "PRE 14A", "PRE 14C", "PREM14A", "PX14A6G", "S-1",
    "S-3", "S-3ASR", "S-4", "S-8", "S-8 POS", "S-11", "SC 13D", "SC 13E3", "SC 13G",
    "SC 14D9", "SC TO-I", "SC TO-T", "SD", "SP 15D2", "UPLOAD",
];

pub fn is_supported_form(form_type: &str) -> bool {
    SUPPORTED_FORMS.contains(&form_type)
}

/// Splits a raw form type into its normalized form and whether it was an amendment.
pub fn split_amendment(raw_form: &str) -> (&str, bool) {
    match raw_form.strip_suffix(EdgarApi::AMENDMENT_SUFFIX) {
        Some(base) => (base, true),
        None => (raw_form, false),
    }
}
