//! HTTP execution capability shared by every provider

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::errors::{Result, TranslationError};

/// Default request timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 30000;

/// HTTP method used by the providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Outbound request handed to an [`HttpTransport`]
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    /// Empty or `None` means a direct connection
    pub proxy_url: Option<String>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            proxy_url: None,
        }
    }

    pub fn post(url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body.into()),
            proxy_url: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn headers<'a>(mut self, headers: impl IntoIterator<Item = &'a (&'a str, &'a str)>) -> Self {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.to_string(), v.to_string())));
        self
    }

    pub fn proxy(mut self, proxy_url: &str) -> Self {
        self.proxy_url = if proxy_url.is_empty() {
            None
        } else {
            Some(proxy_url.to_string())
        };
        self
    }
}

/// Response returned by an [`HttpTransport`]; the body is still content-encoded
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    /// Header names are lower-cased
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes one HTTP exchange
#[async_trait]
pub trait HttpTransport: Send + Sync + std::fmt::Debug {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// [`HttpTransport`] backed by reqwest
///
/// reqwest's own decompression is left off so that the raw body and its
/// `Content-Encoding` reach [`crate::core::decoder`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Self::builder(timeout).build()?;
        Ok(Self { client, timeout })
    }

    fn builder(timeout: Duration) -> reqwest::ClientBuilder {
        reqwest::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(10)
    }

    fn client_for(&self, proxy_url: Option<&str>) -> Result<reqwest::Client> {
        match proxy_url {
            None => Ok(self.client.clone()),
            Some(proxy_url) => {
                let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| {
                    TranslationError::NetworkError {
                        message: format!("invalid proxy url {}: {}", proxy_url, e),
                    }
                })?;
                Ok(Self::builder(self.timeout).proxy(proxy).build()?)
            }
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        let timeout = Duration::from_millis(DEFAULT_TIMEOUT_MS);
        let client = Self::builder(timeout).build().unwrap_or_else(|e| {
            warn!("Falling back to a plain HTTP client: {}", e);
            reqwest::Client::new()
        });
        Self { client, timeout }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let client = self.client_for(request.proxy_url.as_deref())?;

        // per-request timeout also covers a client built without one
        let mut builder = match request.method {
            Method::Get => client.get(&request.url),
            Method::Post => client.post(&request.url),
        }
        .timeout(self.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TranslationError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| TranslationError::NetworkError {
                message: e.to_string(),
            })?
            .to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Run `request` on `transport`, aborting as soon as `ctx` is cancelled
pub async fn send(
    transport: &dyn HttpTransport,
    ctx: &CancellationToken,
    request: HttpRequest,
) -> Result<HttpResponse> {
    if ctx.is_cancelled() {
        return Err(TranslationError::Cancelled);
    }

    debug!("{:?} {}", request.method, request.url);

    tokio::select! {
        _ = ctx.cancelled() => Err(TranslationError::Cancelled),
        response = transport.execute(request) => response,
    }
}
