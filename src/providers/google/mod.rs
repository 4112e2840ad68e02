//! Google Translate through the web UI's batchexecute endpoint

pub mod request;
pub mod response;
pub mod session;

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::config::ProviderConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::language;
use crate::core::models::{TranslationMethod, Translated};
use crate::core::registry::Translator;
use crate::core::transport::{self, HttpTransport};
use crate::providers::read_body;

use request::{random_req_id, BatchRequest};

/// Default Google domain; pages are served from `translate.<host>`
pub const DEFAULT_HOST: &str = "google.com";

const RATE_LIMIT_MESSAGE: &str = "too many requests, google translate is throttling this client";

/// Concurrency-safe client for the unauthenticated Google endpoint
#[derive(Debug)]
pub struct GoogleTranslate {
    config: ProviderConfig,
}

impl GoogleTranslate {
    /// Create a client for [`DEFAULT_HOST`]
    pub fn new() -> Self {
        Self {
            config: ProviderConfig::new(DEFAULT_HOST),
        }
    }

    /// Use a regional domain such as `google.co.id`
    pub fn with_host(self, host: impl Into<String>) -> Self {
        self.config.set_host(host);
        self
    }

    pub fn with_proxy_url(self, proxy_url: impl Into<String>) -> Self {
        self.config.set_proxy_url(proxy_url);
        self
    }

    pub fn with_transport(self, transport: Arc<dyn HttpTransport>) -> Self {
        self.config.set_transport(transport);
        self
    }

    pub fn host(&self) -> String {
        self.config.host()
    }

    pub fn set_host(&self, host: impl Into<String>) {
        self.config.set_host(host);
    }

    pub fn proxy_url(&self) -> String {
        self.config.proxy_url()
    }

    pub fn set_proxy_url(&self, proxy_url: impl Into<String>) {
        self.config.set_proxy_url(proxy_url);
    }

    pub fn transport(&self) -> Arc<dyn HttpTransport> {
        self.config.transport()
    }

    pub fn set_transport(&self, transport: Arc<dyn HttpTransport>) {
        self.config.set_transport(transport);
    }
}

impl Default for GoogleTranslate {
    fn default() -> Self {
        Self::new()
    }
}

fn base_url(host: &str) -> String {
    format!("https://translate.{}", host)
}

/// Source ISO for a response that omitted one; never empty
fn fallback_source_iso(text: &str, from: &str) -> String {
    if !language::is_auto(from) {
        return from.to_string();
    }
    language::detect(text).unwrap_or_else(|_| language::AUTO.to_string())
}

#[async_trait]
impl Translator for GoogleTranslate {
    async fn translate(
        &self,
        ctx: &CancellationToken,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<Translated> {
        if text.is_empty() {
            return Err(TranslationError::validation("text is required"));
        }

        let config = self.config.snapshot();
        let base_url = base_url(&config.host);
        let transport = config.transport.as_ref();

        let token = session::bootstrap(transport, ctx, &base_url, &config.proxy_url).await?;

        let batch = BatchRequest::build(&base_url, &token, text, from, to, random_req_id())?;
        debug!("Google batchexecute _reqid={} {} -> {}", batch.req_id, from, to);

        let response = transport::send(transport, ctx, batch.into_http(&config.proxy_url)).await?;
        let body = read_body(&response, RATE_LIMIT_MESSAGE)?;
        let body = String::from_utf8(body)
            .map_err(|e| TranslationError::invalid_response(format!("response is not UTF-8: {}", e)))?;

        let parsed = response::parse(&body)?;

        let mut from_info = parsed.from;
        if from_info.language.iso.is_empty() {
            from_info.language.iso = fallback_source_iso(text, from);
        }

        Ok(Translated {
            text: parsed.text,
            pronunciation: parsed.pronunciation,
            alternatives: Vec::new(),
            from: from_info,
            method: TranslationMethod::Google,
        })
    }

    fn name(&self) -> &'static str {
        "google"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transport::ReqwestTransport;

    #[test]
    fn test_new() {
        let gt = GoogleTranslate::new();
        assert_eq!(gt.host(), DEFAULT_HOST);
        assert_eq!(gt.proxy_url(), "");
    }

    #[test]
    fn test_with_host() {
        let gt = GoogleTranslate::new().with_host("google.co.id");
        assert_eq!(gt.host(), "google.co.id");
        assert_eq!(base_url(&gt.host()), "https://translate.google.co.id");
    }

    #[test]
    fn test_with_transport() {
        let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::default());
        let gt = GoogleTranslate::new().with_transport(Arc::clone(&transport));
        assert!(Arc::ptr_eq(&gt.transport(), &transport));
    }

    #[test]
    fn test_set_host_and_proxy() {
        let gt = GoogleTranslate::new();
        gt.set_host("google.co.uk");
        gt.set_proxy_url("http://proxy:8080");
        assert_eq!(gt.host(), "google.co.uk");
        assert_eq!(gt.proxy_url(), "http://proxy:8080");
    }

    #[test]
    fn test_fallback_source_iso() {
        assert_eq!(fallback_source_iso("1234", "id"), "id");
        assert_eq!(
            fallback_source_iso("Ceci est une phrase écrite en français, assez longue pour être reconnue.", "auto"),
            "fr"
        );
        assert_eq!(fallback_source_iso("1234", "auto"), "auto");
        assert_eq!(fallback_source_iso("1234", ""), "auto");
    }

    #[tokio::test]
    async fn test_empty_text() {
        let gt = GoogleTranslate::new();
        let err = gt
            .translate(&CancellationToken::new(), "", "en", "id")
            .await
            .unwrap_err();
        assert!(matches!(err, TranslationError::ValidationError { .. }));
    }
}
