//! Reqwest-backed event source.
//!
//! Owns transport details only: the GET request, timeout and HTTP error
//! mapping, and JSON decoding of the body into a response object.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde_json::Value;
use tracing::debug;

use conference_domain::ports::EventSource;
use conference_domain::{FetchError, ResponseObject, RuntimeConfig};

/// Event source that GETs the full event listing from one endpoint.
pub struct HttpEventSource {
    client: Client,
    events_url: Url,
    user_agent: String,
    api_token: Option<String>,
}

impl HttpEventSource {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        events_url: Url,
        timeout: Duration,
        user_agent: impl Into<String>,
        api_token: Option<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            events_url,
            user_agent: user_agent.into(),
            api_token,
        })
    }

    pub fn from_config(config: &RuntimeConfig) -> Result<Self> {
        let events_url = Url::parse(&config.events_url())?;
        let source = Self::new(
            events_url,
            Duration::from_secs(config.request_timeout_seconds.max(1)),
            config.user_agent.clone(),
            config.api_token.clone(),
        )?;
        Ok(source)
    }

    pub fn events_url(&self) -> &Url {
        &self.events_url
    }

    fn get(&self) -> RequestBuilder {
        let request = self
            .client
            .get(self.events_url.clone())
            .header(USER_AGENT, self.user_agent.as_str())
            .header(ACCEPT, "application/json");
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl EventSource for HttpEventSource {
    async fn fetch_all_events(&self) -> Result<ResponseObject, FetchError> {
        let response = self.get().send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        debug!(url = %self.events_url, bytes = body.len(), "fetched events");
        parse_response(body.as_ref())
    }

    async fn ping(&self) -> Result<(), FetchError> {
        let response = self.get().send().await.map_err(map_transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(map_status_error(status, &[]));
        }
        Ok(())
    }
}

fn parse_response(body: &[u8]) -> Result<ResponseObject, FetchError> {
    serde_json::from_slice::<Value>(body)
        .map(ResponseObject::new)
        .map_err(|err| FetchError::decode(format!("invalid events JSON: {err}")))
}

fn map_transport_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::timeout(error.to_string())
    } else {
        FetchError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> FetchError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => FetchError::timeout(message),
        _ if status.is_client_error() => FetchError::status(status.as_u16(), message),
        _ => FetchError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
