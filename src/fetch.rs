/// Blocking HTTP transport.
///
/// Every network call the relay makes (station fetches and the upload) is a
/// plain GET, so the seam is a single method. `HttpTransport` is the real
/// implementation; tests substitute canned responses.

use std::time::Duration;

use crate::model::{RelayError, Result};

const USER_AGENT: &str = concat!("windrelay/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Anything that can perform a GET request.
pub trait Transport {
    fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// `reqwest` blocking client with a fixed user agent and timeout.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpResponse { status, body })
    }
}

/// Fetches a source document, treating any non-2xx status as an error.
pub fn get_text(transport: &dyn Transport, url: &str) -> Result<String> {
    tracing::debug!(url, "fetching");
    let response = transport.get(url)?;

    if !(200..300).contains(&response.status) {
        return Err(RelayError::Http(format!(
            "{} returned HTTP {}",
            url, response.status
        )));
    }

    Ok(response.body)
}
