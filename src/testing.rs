//! In-memory transport and EDGAR fixtures shared by unit tests

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::edgar::{EdgarApi, TickerTable};
use crate::errors::TransportError;
use crate::models::Identity;
use crate::transport::Transport;

/// Serves canned responses by URL and records every request made.
#[derive(Default)]
pub struct FakeTransport {
    json: HashMap<String, Value>,
    bytes: HashMap<String, Vec<u8>>,
    requested: Mutex<Vec<String>>,
    user_agents: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(mut self, url: &str, body: Value) -> Self {
        self.json.insert(url.to_string(), body);
        self
    }

    pub fn with_bytes(mut self, url: &str, body: &[u8]) -> Self {
        self.bytes.insert(url.to_string(), body.to_vec());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    pub fn user_agents(&self) -> Vec<String> {
        self.user_agents.lock().unwrap().clone()
    }

    fn record(&self, url: &str, identity: &Identity) {
        self.requested.lock().unwrap().push(url.to_string());
        self.user_agents.lock().unwrap().push(identity.user_agent());
    }

    fn not_found(url: &str) -> TransportError {
        TransportError::Status {
            url: url.to_string(),
            status: 404,
        }
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn fetch_json(&self, url: &str, identity: &Identity) -> Result<Value, TransportError> {
        self.record(url, identity);
        self.json.get(url).cloned().ok_or_else(|| Self::not_found(url))
    }

    async fn fetch_bytes(&self, url: &str, identity: &Identity) -> Result<Vec<u8>, TransportError> {
        self.record(url, identity);
        self.bytes.get(url).cloned().ok_or_else(|| Self::not_found(url))
    }
}

pub fn identity() -> Identity {
    Identity::new("Test Corp", "test@example.com").unwrap()
}

pub fn ticker_table() -> TickerTable {
    [("AAPL", "0000320193")].into_iter().collect()
}

/// Parallel-array columns from `(accession, form, filing date, primary document)` rows.
pub fn columns(rows: &[(&str, &str, &str, &str)]) -> Value {
    let column = |i: usize| -> Vec<String> {
        rows.iter().map(|r| [r.0, r.1, r.2, r.3][i].to_string()).collect()
    };
    json!({
        "accessionNumber": column(0),
        "form": column(1),
        "filingDate": column(2),
        "primaryDocument": column(3),
        "reportDate": rows.iter().map(|_| "").collect::<Vec<_>>(),
        "items": rows.iter().map(|r| if r.1.starts_with("8-K") { "2.02,9.01" } else { "" }).collect::<Vec<_>>(),
        "primaryDocDescription": column(1),
    })
}

pub fn first_page(cik: Value, name: &str, tickers: &[(&str, &str)], recent: Value, files: &[&str]) -> Value {
    json!({
        "cik": cik,
        "name": name,
        "tickers": tickers.iter().map(|t| t.0).collect::<Vec<_>>(),
        "exchanges": tickers.iter().map(|t| t.1).collect::<Vec<_>>(),
        "filings": {
            "recent": recent,
            "files": files.iter().map(|f| json!({"name": f, "filingCount": 3})).collect::<Vec<_>>(),
        },
    })
}

pub const APPLE_10K_2023_URL: &str =
    "https://www.sec.gov/Archives/edgar/data/320193/000032019323000106/aapl-20230930.htm";

/// Apple's index over three pages, newest first:
/// - page 1: 10-K (2023), 10-Q, 10-K/A, 10-K (2022)
/// - page 2: 10-Q, 10-K (2021), 10-K/A
/// - page 3: 10-Q, 8-K
pub fn apple_fixture() -> FakeTransport {
    let recent = columns(&[
        ("0000320193-23-000106", "10-K", "2023-11-03", "aapl-20230930.htm"),
        ("0000320193-23-000077", "10-Q", "2023-08-04", "aapl-20230701.htm"),
        ("0000320193-23-000064", "10-K/A", "2023-05-10", "aapl-20220924a.htm"),
        ("0000320193-22-000108", "10-K", "2022-10-28", "aapl-20220924.htm"),
    ]);
    let page_one = columns(&[
        ("0000320193-22-000070", "10-Q", "2022-07-29", "aapl-20220625.htm"),
        ("0000320193-21-000105", "10-K", "2021-10-29", "aapl-20210925.htm"),
        ("0000320193-21-000080", "10-K/A", "2021-06-01", "aapl-20200926a.htm"),
    ]);
    let page_two = columns(&[
        ("0000320193-20-000062", "10-Q", "2020-07-31", "aapl-20200627.htm"),
        ("0000320193-19-000119", "8-K", "2019-10-30", "a8-k20191030.htm"),
    ]);

    FakeTransport::new()
        .with_json(
            "https://data.sec.gov/submissions/CIK0000320193.json",
            first_page(
                json!("320193"),
                "Apple Inc.",
                &[("AAPL", "Nasdaq")],
                recent,
                &[
                    "CIK0000320193-submissions-001.json",
                    "CIK0000320193-submissions-002.json",
                ],
            ),
        )
        .with_json(
            "https://data.sec.gov/submissions/CIK0000320193-submissions-001.json",
            page_one,
        )
        .with_json(
            "https://data.sec.gov/submissions/CIK0000320193-submissions-002.json",
            page_two,
        )
        .with_json(
            EdgarApi::COMPANY_TICKERS_URL,
            json!({"0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."}}),
        )
        .with_bytes(APPLE_10K_2023_URL, b"<html><body>Apple 10-K 2023</body></html>")
        .with_bytes(
            "https://www.sec.gov/Archives/edgar/data/320193/000032019322000108/aapl-20220924.htm",
            b"<html><body>Apple 10-K 2022 \xff</body></html>",
        )
}
