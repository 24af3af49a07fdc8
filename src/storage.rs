//! On-disk staging of downloaded documents and CSV export of filing records

use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::errors::Result;
use crate::models::{AccessionNumber, FilingRecord};

/// Extensions of the HTML renditions EDGAR serves for primary documents.
pub const HTML_EXTENSIONS: &[&str] = &["htm", "html"];

/// Where `record`'s primary document is stored under `output_dir`:
/// `edgar/<TICKER or CIK>/<FORM>-<filing date>-<accession>.<ext>`.
pub fn document_path(output_dir: &Path, record: &FilingRecord) -> Result<PathBuf> {
    let accession = AccessionNumber::parse(&record.accession_number)?;
    let extension = record
        .primary_doc_url
        .rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .unwrap_or("txt");

    let file_name = format!(
        "{}-{}-{}.{}",
        record.form_type.replace(['/', ' '], "-"),
        record.filing_date,
        accession.without_dashes(),
        extension
    );
    Ok(output_dir.join("edgar").join(record.label()).join(file_name))
}

pub fn save_document(output_dir: &Path, record: &FilingRecord, content: &[u8]) -> Result<PathBuf> {
    let path = document_path(output_dir, record)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, content)?;
    info!("Saved {} ({} bytes)", path.display(), content.len());
    Ok(path)
}

/// Reads every file below `dir` whose extension is in `extensions`, as
/// `(path relative to dir, text)` pairs sorted by path. Invalid UTF-8 is replaced.
pub fn read_documents(dir: &Path, extensions: &[&str]) -> Result<Vec<(PathBuf, String)>> {
    let mut documents = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)));
        if !matches {
            continue;
        }

        let bytes = std::fs::read(entry.path())?;
        let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path()).to_path_buf();
        debug!("Read staged document {}", relative.display());
        documents.push((relative, String::from_utf8_lossy(&bytes).into_owned()));
    }
    Ok(documents)
}

/// Writes records as CSV with a header row. Tickers are flattened to
/// `SYMBOL:EXCHANGE` pairs joined by `;`.
pub fn export_csv<W: Write>(records: &[FilingRecord], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record([
        "accession_number",
        "form_type",
        "filing_date",
        "report_date",
        "cik",
        "company_name",
        "tickers",
        "items",
        "primary_doc_description",
        "primary_doc_url",
    ])?;

    for record in records {
        let tickers = record
            .tickers
            .iter()
            .map(|t| format!("{}:{}", t.symbol, t.exchange))
            .collect::<Vec<_>>()
            .join(";");
        csv.write_record([
            record.accession_number.as_str(),
            record.form_type.as_str(),
            record.filing_date.as_str(),
            record.report_date.as_str(),
            record.cik.as_str(),
            record.company_name.as_str(),
            tickers.as_str(),
            record.items.as_str(),
            record.primary_doc_description.as_str(),
            record.primary_doc_url.as_str(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TickerRecord;
    use tempfile::TempDir;

    fn record() -> FilingRecord {
        FilingRecord {
            accession_number: "0000320193-23-000106".to_string(),
            form_type: "10-K".to_string(),
            primary_doc_url: "https://www.sec.gov/Archives/edgar/data/320193/000032019323000106/aapl-20230930.htm"
                .to_string(),
            items: String::new(),
            primary_doc_description: "10-K".to_string(),
            filing_date: "2023-11-03".to_string(),
            report_date: "2023-09-30".to_string(),
            cik: "0000320193".to_string(),
            company_name: "Apple Inc.".to_string(),
            tickers: vec![TickerRecord {
                symbol: "AAPL".to_string(),
                exchange: "Nasdaq".to_string(),
            }],
        }
    }

    #[test]
    fn test_document_path_layout() {
        let path = document_path(Path::new("/out"), &record()).unwrap();
        assert_eq!(
            path,
            Path::new("/out/edgar/AAPL/10-K-2023-11-03-000032019323000106.htm")
        );

        let mut no_ticker = record();
        no_ticker.tickers.clear();
        no_ticker.form_type = "DEF 14A".to_string();
        let path = document_path(Path::new("/out"), &no_ticker).unwrap();
        assert_eq!(
            path,
            Path::new("/out/edgar/0000320193/DEF-14A-2023-11-03-000032019323000106.htm")
        );
    }

    #[test]
    fn test_save_and_read_back_html_only() {
        let temp_dir = TempDir::new().unwrap();
        let saved = save_document(temp_dir.path(), &record(), b"<html>10-K</html>").unwrap();
        assert!(saved.exists());

        let other = temp_dir.path().join("edgar").join("AAPL").join("notes.txt");
        std::fs::write(&other, "not html").unwrap();

        let documents = read_documents(temp_dir.path(), HTML_EXTENSIONS).unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(
            documents[0].0,
            Path::new("edgar/AAPL/10-K-2023-11-03-000032019323000106.htm")
        );
        assert_eq!(documents[0].1, "<html>10-K</html>");
    }

    #[test]
    fn test_export_csv() {
        let mut buffer = Vec::new();
        export_csv(&[record()], &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("accession_number,form_type,filing_date"));
        assert!(lines[1].starts_with("0000320193-23-000106,10-K,2023-11-03,2023-09-30,0000320193,Apple Inc.,AAPL:Nasdaq,"));
    }
}
