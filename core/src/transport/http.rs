//! reqwest-backed transport

use super::{ApiRequest, Transport};
use crate::config::ResolvedApiConfig;
use crate::error::{ConfigError, Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// HTTP transport owning base URL, default headers and timeout
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a new transport from resolved config
    pub fn new(config: &ResolvedApiConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        for (key, value) in &config.headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
                ConfigError::InvalidValue {
                    field: "headers".to_string(),
                    value: key.clone(),
                }
            })?;
            let value = HeaderValue::from_str(value).map_err(|_| ConfigError::InvalidValue {
                field: format!("headers.{}", key),
                value: "<non-visible characters>".to_string(),
            })?;
            headers.insert(name, value);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: Url::parse(&config.base_url)?,
        })
    }

    /// Get the base URL requests are sent against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join the base URL and a request path
    ///
    /// The base may carry a path prefix (`https://host/api`); the request path
    /// is appended to it rather than replacing it.
    fn url_for(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}{}", base, path))?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        let url = self.url_for(&request.path)?;
        debug!(method = %request.method, %url, params = request.query.len(), "sending request");

        let mut builder = self.client.request(request.method.into(), url);
        if !request.query.is_empty() {
            builder = builder.query(request.query.as_pairs());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "request failed");
            return Err(Error::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&text)?)
    }
}
