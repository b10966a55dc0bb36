//! Exam catalog fetching from the scheduling gateway
//!
//! The gateway lists the exams offered for one identifier per call:
//! ```text
//! POST <url>
//! Content-Type: application/json
//!
//! {"id": "CT"}
//! ```
//! answered by `{"data": [{"code": "...", "libelle": "..."}, ...]}`.
//! Numeric codes are accepted; records without a usable code or label are
//! dropped one by one rather than failing the whole listing.

use async_trait::async_trait;
use examcode_core::{Error, ExamCatalog, ExamEntry, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Listing endpoint of the sandbox gateway
pub const DEFAULT_CATALOG_URL: &str =
    "https://sandbox.xplore.fr:20443/XaPriseRvGateway/Application/api/External/GetListeExamensFromTypeExamen";

/// Per-identifier request timeout
pub const DEFAULT_CATALOG_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of exam catalogs
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the catalog for the given identifiers, or for every recognized
    /// identifier when `identifiers` is `None`. Failures for individual
    /// identifiers are absorbed; the result may be empty.
    async fn fetch(&self, identifiers: Option<&[String]>) -> ExamCatalog;

    /// Source name used in logs
    fn name(&self) -> &str;
}

/// How results for several identifiers are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Each successful identifier replaces what was fetched before, so the
    /// catalog holds only the last successful identifier's exams. This is
    /// the behaviour existing gateway clients rely on.
    #[default]
    Replace,

    /// Catalogs of all successful identifiers are merged
    Merge,
}

/// Catalog gateway settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Listing endpoint
    #[serde(default = "default_url")]
    pub url: String,

    /// Timeout for each identifier's request, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Combination of multi-identifier results
    #[serde(default)]
    pub fetch_mode: FetchMode,
}

impl CatalogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
            fetch_mode: FetchMode::default(),
        }
    }
}

fn default_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_CATALOG_TIMEOUT.as_secs()
}

#[derive(Debug, Serialize)]
struct ListingRequest<'a> {
    id: &'a str,
}

#[derive(Debug, Deserialize)]
struct ListingResponse {
    #[serde(default)]
    data: Option<Vec<Value>>,
}

/// Parse a listing body into a catalog, skipping malformed records
pub fn parse_listing(body: &str, id: &str) -> Result<ExamCatalog> {
    let listing: ListingResponse = serde_json::from_str(body)?;

    let mut entries = Vec::new();
    for record in listing.data.unwrap_or_default() {
        match exam_entry(&record) {
            Some(entry) => entries.push(entry),
            None => warn!("Skipping malformed exam record for identifier {}: {}", id, record),
        }
    }

    Ok(entries.into_iter().collect())
}

fn exam_entry(record: &Value) -> Option<ExamEntry> {
    let code = match record.get("code")? {
        Value::String(code) => code.clone(),
        Value::Number(code) => code.to_string(),
        _ => return None,
    };
    let label = record.get("libelle")?.as_str()?.to_string();
    Some(ExamEntry { code, label })
}

/// HTTP client for the gateway's listing endpoint
#[derive(Debug, Clone)]
pub struct GatewayCatalogFetcher {
    config: CatalogConfig,
    known_identifiers: Vec<String>,
}

impl GatewayCatalogFetcher {
    /// Create a fetcher accepting the given identifiers
    pub fn new(config: CatalogConfig, known_identifiers: Vec<String>) -> Self {
        Self {
            config,
            known_identifiers,
        }
    }

    /// Upper-case, drop unrecognized and duplicate identifiers.
    /// `None` selects every recognized identifier.
    pub fn resolve_identifiers(&self, identifiers: Option<&[String]>) -> Vec<String> {
        let Some(requested) = identifiers else {
            return self.known_identifiers.clone();
        };

        let mut resolved: Vec<String> = Vec::with_capacity(requested.len());
        for id in requested {
            let id = id.to_uppercase();
            if !self.known_identifiers.contains(&id) {
                debug!("Dropping unrecognized catalog identifier {}", id);
                continue;
            }
            if !resolved.contains(&id) {
                resolved.push(id);
            }
        }
        resolved
    }

    /// HTTP session for one fetch call; dropped (and its connections closed)
    /// when the call returns
    fn session(&self) -> Result<reqwest::Client> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        reqwest::Client::builder()
            .default_headers(headers)
            .timeout(self.config.timeout())
            .build()
            .map_err(Error::from)
    }

    async fn fetch_one(&self, session: &reqwest::Client, id: &str) -> Result<ExamCatalog> {
        let response = session
            .post(&self.config.url)
            .json(&ListingRequest { id })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout
                } else {
                    Error::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::catalog(format!("status {} for identifier {}", status, id)));
        }

        let body = response.text().await?;
        parse_listing(&body, id)
    }
}

#[async_trait]
impl CatalogSource for GatewayCatalogFetcher {
    async fn fetch(&self, identifiers: Option<&[String]>) -> ExamCatalog {
        let identifiers = self.resolve_identifiers(identifiers);
        let mut catalog = ExamCatalog::new();
        if identifiers.is_empty() {
            return catalog;
        }

        let session = match self.session() {
            Ok(session) => session,
            Err(e) => {
                warn!("Could not open catalog session: {}", e);
                return catalog;
            }
        };

        for id in &identifiers {
            match self.fetch_one(&session, id).await {
                Ok(fetched) => {
                    info!("Fetched {} exams for identifier {}", fetched.len(), id);
                    match self.config.fetch_mode {
                        FetchMode::Replace => catalog = fetched,
                        FetchMode::Merge => catalog.extend(fetched),
                    }
                }
                Err(e) => warn!("Skipping catalog identifier {}: {}", id, e),
            }
        }

        catalog
    }

    fn name(&self) -> &str {
        "gateway"
    }
}
