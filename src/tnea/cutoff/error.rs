use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// tool fetches, transforms, or exports cutoff data.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Retrieval of the raw records failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Raised when the requested admission year has no API code.
    #[error("invalid year {year}; supported years: {supported}")]
    UnsupportedYear { year: i64, supported: String },

    /// Raised when a sort column identifier matches no known column.
    #[error("sort column '{requested}' not found; available columns: {available}")]
    UnknownColumn { requested: String, available: String },

    /// Raised when an export format needs a renderer this build does not carry.
    #[error("{format} export is unavailable: {reason}")]
    ExportUnavailable { format: String, reason: String },

    /// Wrapper for IO failures such as writing export files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing or serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the CSV writer.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Raised when the document renderer fails to produce the PDF.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

/// Distinguishable failure kinds of the single HTTP fetch. Every variant names
/// the URL that was requested.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-2xx status.
    #[error("HTTP error {status} for {url}{}", status_hint(.status))]
    Status { url: String, status: u16 },

    /// The connection could not be established.
    #[error("connection error for {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request did not complete within the configured timeout.
    #[error("timeout fetching {url}")]
    Timeout {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Any other transport failure reported by the HTTP client.
    #[error("request error for {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The body was not a JSON array of objects.
    #[error("malformed response body from {url}: {source}; body starts with {preview:?}")]
    MalformedBody {
        url: String,
        preview: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Short machine-friendly name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Status { .. } => "http-status",
            FetchError::Connection { .. } => "connection",
            FetchError::Timeout { .. } => "timeout",
            FetchError::Request { .. } => "request",
            FetchError::MalformedBody { .. } => "malformed-body",
        }
    }

    /// URL of the failed request.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Status { url, .. }
            | FetchError::Connection { url, .. }
            | FetchError::Timeout { url, .. }
            | FetchError::Request { url, .. }
            | FetchError::MalformedBody { url, .. } => url,
        }
    }

    /// Classifies a transport error from the HTTP client.
    pub(crate) fn from_transport(url: &str, source: reqwest::Error) -> Self {
        let url = url.to_string();
        if source.is_timeout() {
            FetchError::Timeout { url, source }
        } else if source.is_connect() {
            FetchError::Connection { url, source }
        } else {
            FetchError::Request { url, source }
        }
    }
}

fn status_hint(status: &u16) -> &'static str {
    match *status {
        401 => " (authorization issue or invalid API endpoint)",
        404 => " (resource not found; check the year/API code)",
        _ => "",
    }
}
