use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::error::PatientViewError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub lines: Vec<String>,
}

impl FetchResponse {
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            lines: body.lines().map(str::to_string).collect(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Line-oriented GET against an external endpoint. Transport failures are
/// errors; any HTTP status is a response.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<FetchResponse, PatientViewError>;
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, PatientViewError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("patient-view/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| PatientViewError::Http(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|err| PatientViewError::Http(err.to_string()))?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<FetchResponse, PatientViewError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| PatientViewError::Http(err.to_string()))?;
        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Ok(FetchResponse {
                status,
                lines: Vec::new(),
            });
        }
        let body = response
            .text()
            .map_err(|err| PatientViewError::Http(err.to_string()))?;
        Ok(FetchResponse::new(status, &body))
    }
}
