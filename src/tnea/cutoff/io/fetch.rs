use reqwest::blocking::Client;
use tracing::{debug, info, instrument};

use crate::tnea::cutoff::config::FetchConfig;
use crate::tnea::cutoff::error::FetchError;
use crate::tnea::cutoff::model::RawRecord;

const USER_AGENT: &str = concat!("tnea-cutoff/", env!("CARGO_PKG_VERSION"));

/// Source of raw cutoff records for one year code.
pub trait RecordSource {
    /// Location the records for `year_code` are read from, for diagnostics.
    fn location(&self, year_code: &str) -> String;

    /// Retrieves every raw record for `year_code`.
    fn fetch(&self, year_code: &str) -> Result<Vec<RawRecord>, FetchError>;
}

/// Blocking HTTP implementation of [`RecordSource`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Builds a client whose requests fail once `config.timeout` elapses.
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| FetchError::from_transport(&config.base_url, source))?;
        Ok(Self { client, config })
    }
}

impl RecordSource for HttpFetcher {
    fn location(&self, year_code: &str) -> String {
        self.config.url_for(year_code)
    }

    #[instrument(level = "info", skip(self), fields(timeout = ?self.config.timeout))]
    fn fetch(&self, year_code: &str) -> Result<Vec<RawRecord>, FetchError> {
        let url = self.location(year_code);
        info!(%url, "fetching cutoff data");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|source| FetchError::from_transport(&url, source))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .map_err(|source| FetchError::from_transport(&url, source))?;
        debug!(bytes = body.len(), "response received");
        parse_records(&url, &body)
    }
}

/// Parses a response body that must be a JSON array of objects.
pub fn parse_records(url: &str, body: &str) -> Result<Vec<RawRecord>, FetchError> {
    serde_json::from_str::<Vec<RawRecord>>(body).map_err(|source| FetchError::MalformedBody {
        url: url.to_string(),
        preview: body.chars().take(200).collect(),
        source,
    })
}
