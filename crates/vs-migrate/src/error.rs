use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("the request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("the request failed with status code {0}: {1}")]
    ResponseError(reqwest::StatusCode, String),
    #[error("the response body could not be read: {0}")]
    ResponseBodyError(#[source] reqwest::Error),
    #[error("unable to parse the response body: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("the response did not carry a document id")]
    MissingId,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unable to read the file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("unable to parse the file: {0}")]
    ParseError(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("unable to write the file: {0}")]
    WriteError(#[from] std::io::Error),
    #[error("unable to serialize the data: {0}")]
    SerializeError(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("the geocoding request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("the geocoding request failed with status code: {0}")]
    ResponseError(reqwest::StatusCode),
    #[error("the geocoding response had no message content")]
    EmptyContent,
    #[error("the geocoding answer is not valid JSON: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("the geocoding answer is missing latitude or longitude")]
    MissingCoordinates,
}

impl GeocodeError {
    /// Whether the service answered but the answer was unusable.
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            Self::EmptyContent | Self::ParseError(_) | Self::MissingCoordinates
        )
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unable to fetch venues from the source: {0}")]
    Source(#[source] ApiError),
    #[error("unable to prepare the output directory {0}: {1}")]
    OutputDir(PathBuf, #[source] std::io::Error),
    #[error("unable to write the snapshot: {0}")]
    Save(#[from] SaveError),
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("unable to fetch venues from the source: {0}")]
    Source(#[source] ApiError),
    #[error("unable to prepare the image store {0}: {1}")]
    Store(PathBuf, #[source] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("snapshot {0} not found, run the export first")]
    SnapshotMissing(PathBuf),
    #[error("unable to load the snapshot: {0}")]
    Load(#[from] LoadError),
    #[error("unable to reach the CMS API: {0}")]
    Unreachable(#[source] ApiError),
}

#[derive(Debug, Error)]
#[error("failed to initialize tracing: {0}")]
pub struct TelemetryError(#[source] pub Box<dyn std::error::Error + Send + Sync + 'static>);
