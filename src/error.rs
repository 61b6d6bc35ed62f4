use thiserror::Error;

/// Per-cell numeric normalization failure. The caller drops the offending
/// row and keeps going; a single bad cell never aborts a fetch cycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizationError {
    #[error("not a numeric value: {text:?}")]
    NotNumeric { text: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The structural marker is absent: the site layout changed.
    #[error("quotes table not found (marker: {marker})")]
    TableNotFound { marker: String },

    /// The marker was found but the table carries no data rows.
    #[error("quotes table has no data rows")]
    EmptyTable,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("header has no columns")]
    EmptyHeader,

    #[error("numeric column index {index} is out of range for a {width}-column header")]
    ColumnOutOfRange { index: usize, width: usize },
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("upstream responded with HTTP status {status}")]
    FetchFailed { status: u16 },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("dataset construction failed: {0}")]
    Build(#[from] BuildError),
}

/// Failures in the artifact collaborators (CSV file, chart image).
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("chart rendering failed: {0}")]
    Chart(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
