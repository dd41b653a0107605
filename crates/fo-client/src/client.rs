//! Shared HTTP client

use std::time::Duration;

use fo_core::config::AppConfig;
use fo_core::error::{FoError, SubmissionError};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use url::Url;

/// Client for the FieldOps backend REST API
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

/// `{success, data, message}` wrapper the backend puts around every body
///
/// Missing keys deserialize as `None`; `T` needs no `Default`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub success: Option<bool>,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl HttpApiClient {
    /// `base_url` must end with `/` for relative paths to resolve under it
    pub fn new(base_url: Url, token: Option<String>, timeout: Duration) -> Result<Self, FoError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FoError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, FoError> {
        Self::new(
            config.api_base_url()?,
            config.api.token.clone(),
            config.request_timeout(),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, SubmissionError> {
        self.base_url
            .join(path)
            .map_err(|e| SubmissionError::InvalidResponse(format!("bad endpoint '{}': {}", path, e)))
    }

    pub(crate) fn get(&self, url: Url) -> RequestBuilder {
        self.authorize(self.http.get(url))
    }

    pub(crate) fn patch(&self, url: Url) -> RequestBuilder {
        self.authorize(self.http.patch(url))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("Accept", "application/json");
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Message for a non-2xx response, preferring the envelope's `message`
pub(crate) fn rejection_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<Envelope<serde_json::Value>>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| {
            let trimmed: String = body.trim().chars().take(200).collect();
            if trimmed.is_empty() {
                fallback.to_string()
            } else {
                trimmed
            }
        })
}
