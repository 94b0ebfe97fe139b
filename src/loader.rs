use crate::incident::{Incident, RecordError};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Published copy of the DC stop-and-frisk incidents, one row per stop.
pub const DEFAULT_DATA_URL: &str =
    "https://raw.githubusercontent.com/GWarrenn/dc-stop-frisk-dash/master/nbh_sf_df.csv";

/// Columns every dataset must carry. Others are ignored.
pub const REQUIRED_COLUMNS: [&str; 3] = ["neighborhood", "race_ethn", "incident_date"];

/// Where the incident table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    Url(String),
    Path(PathBuf),
}

impl Default for DatasetSource {
    fn default() -> Self {
        DatasetSource::Url(DEFAULT_DATA_URL.to_string())
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::Url(url) => write!(f, "{}", url),
            DatasetSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Configuration for the dataset loader
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Request timeout in seconds (default: 30)
    pub timeout_seconds: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig { timeout_seconds: 30 }
    }
}

/// A row that was left out of the load, with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub line: u64,
    pub reason: RecordError,
}

/// Outcome of a load: every accepted incident plus the rows that were not.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub incidents: Vec<Incident>,
    pub skipped: Vec<SkippedRecord>,
}

impl LoadReport {
    pub fn rows_read(&self) -> usize {
        self.incidents.len() + self.skipped.len()
    }
}

/// Fetches and parses the incident dataset.
#[derive(Debug)]
pub struct DatasetLoader {
    client: Client,
}

impl DatasetLoader {
    /// Creates a loader with default configuration.
    pub fn new() -> Result<Self, LoadError> {
        Self::with_config(LoaderConfig::default())
    }

    /// Creates a loader with custom configuration.
    ///
    /// # Errors
    /// Returns `LoadError::ClientCreation` if the HTTP client cannot be built.
    pub fn with_config(config: LoaderConfig) -> Result<Self, LoadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| LoadError::ClientCreation(e.to_string()))?;

        Ok(DatasetLoader { client })
    }

    /// Loads the dataset from `source`.
    ///
    /// Rows that fail individually are reported in `LoadReport::skipped` and
    /// logged; only transport failures and a missing required column abort
    /// the load.
    pub async fn load(&self, source: &DatasetSource) -> Result<LoadReport, LoadError> {
        info!(%source, "Loading incident dataset");

        let body = match source {
            DatasetSource::Url(url) => self.fetch_csv(url).await?,
            DatasetSource::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|e| LoadError::Io(format!("{}: {}", path.display(), e)))?,
        };

        let report = parse_incidents(body.as_slice())?;

        for skipped in &report.skipped {
            warn!(line = skipped.line, reason = %skipped.reason, "Skipping incident row");
        }
        info!(
            incidents = report.incidents.len(),
            skipped = report.skipped.len(),
            "Incident dataset loaded"
        );

        Ok(report)
    }

    /// Downloads the raw CSV body.
    ///
    /// # Errors
    /// Returns `LoadError::Fetch` on a network failure and `LoadError::Status`
    /// when the server answers with a non-success status.
    pub async fn fetch_csv(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error").to_string(),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LoadError::Fetch(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}

/// Raw dataset row; columns beyond these three are ignored.
#[derive(Debug, Deserialize)]
struct RawIncident {
    neighborhood: String,
    race_ethn: String,
    incident_date: String,
}

impl RawIncident {
    fn into_incident(self) -> Result<Incident, RecordError> {
        Incident::from_raw(&self.neighborhood, &self.race_ethn, &self.incident_date)
    }
}

/// Parses CSV text with a header row into incidents.
///
/// # Errors
/// Fails only when the header row cannot be read or lacks one of
/// `REQUIRED_COLUMNS`. Per-row problems end up in `LoadReport::skipped`.
pub fn parse_incidents<R: Read>(reader: R) -> Result<LoadReport, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| LoadError::Csv(e.to_string()))?
        .clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|header| header == **column))
    {
        return Err(LoadError::MissingColumn(missing.to_string()));
    }

    let mut report = LoadReport::default();

    for (index, row) in csv_reader.records().enumerate() {
        // Header occupies line 1.
        let fallback_line = index as u64 + 2;

        let record = match row {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(fallback_line);
                report.skipped.push(SkippedRecord {
                    line,
                    reason: RecordError::Csv(e.to_string()),
                });
                continue;
            }
        };

        let line = record.position().map(|p| p.line()).unwrap_or(fallback_line);
        let parsed = record
            .deserialize::<RawIncident>(Some(&headers))
            .map_err(|e| RecordError::Csv(e.to_string()))
            .and_then(RawIncident::into_incident);

        match parsed {
            Ok(incident) => report.incidents.push(incident),
            Err(reason) => report.skipped.push(SkippedRecord { line, reason }),
        }
    }

    Ok(report)
}

/// Errors that abort a dataset load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// HTTP client creation failed
    ClientCreation(String),
    /// Network error while fetching the dataset
    Fetch(String),
    /// Server answered with a non-success status
    Status(u16, String),
    /// Local file could not be read
    Io(String),
    /// Header row could not be read
    Csv(String),
    /// A required column is absent from the header row
    MissingColumn(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::ClientCreation(msg) => write!(f, "Client creation error: {}", msg),
            LoadError::Fetch(msg) => write!(f, "Network error: {}", msg),
            LoadError::Status(code, reason) => write!(f, "HTTP {}: {}", code, reason),
            LoadError::Io(msg) => write!(f, "I/O error: {}", msg),
            LoadError::Csv(msg) => write!(f, "CSV error: {}", msg),
            LoadError::MissingColumn(name) => write!(f, "Missing required column '{}'", name),
        }
    }
}

impl std::error::Error for LoadError {}
