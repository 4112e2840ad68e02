//! DeepL through the web client's JSON-RPC endpoint

pub mod response;
pub mod signer;

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::config::ProviderConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{TranslationMethod, Translated};
use crate::core::registry::Translator;
use crate::core::transport::{self, HttpRequest, HttpTransport};
use crate::providers::read_body;

pub const DEFAULT_HOST: &str = "www2.deepl.com";

const RATE_LIMIT_MESSAGE: &str = "too many requests, your IP has been blocked by DeepL temporarily, please don't request it frequently in a short time";

const HEADERS: &[(&str, &str)] = &[
    ("Content-Type", "application/json"),
    ("Accept", "*/*"),
    ("Accept-Language", "en-US,en;q=0.9"),
    ("Accept-Encoding", "gzip, deflate, br"),
    ("Origin", "https://www.deepl.com"),
    ("Referer", "https://www.deepl.com/"),
    ("Sec-Fetch-Dest", "empty"),
    ("Sec-Fetch-Mode", "cors"),
    ("Sec-Fetch-Site", "same-site"),
    ("User-Agent", "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/141.0.0.0 Safari/537.36 Edg/141.0.0.0"),
];

/// Concurrency-safe client for the session-gated DeepL endpoint
///
/// Without a `dl_session` cookie calls go to the free tier; with one they
/// are reported as `Pro`.
#[derive(Debug)]
pub struct DeepL {
    config: ProviderConfig,
}

impl DeepL {
    pub fn new() -> Self {
        Self {
            config: ProviderConfig::new(DEFAULT_HOST),
        }
    }

    pub fn with_host(self, host: impl Into<String>) -> Self {
        self.config.set_host(host);
        self
    }

    pub fn with_proxy_url(self, proxy_url: impl Into<String>) -> Self {
        self.config.set_proxy_url(proxy_url);
        self
    }

    pub fn with_dl_session(self, dl_session: impl Into<String>) -> Self {
        self.config.set_credential(dl_session);
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

    pub fn dl_session(&self) -> String {
        self.config.credential()
    }

    pub fn set_dl_session(&self, dl_session: impl Into<String>) {
        self.config.set_credential(dl_session);
    }

    pub fn transport(&self) -> Arc<dyn HttpTransport> {
        self.config.transport()
    }

    pub fn set_transport(&self, transport: Arc<dyn HttpTransport>) {
        self.config.set_transport(transport);
    }
}

impl Default for DeepL {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Translator for DeepL {
    async fn translate(
        &self,
        ctx: &CancellationToken,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<Translated> {
        if text.is_empty() {
            return Err(TranslationError::validation("No text to translate"));
        }

        let config = self.config.snapshot();

        let source_lang = signer::resolve_source(text, from)?;
        let target_lang = to.to_ascii_uppercase();
        let signed = signer::sign(
            text,
            &source_lang,
            &target_lang,
            signer::random_id(),
            chrono::Utc::now().timestamp_millis(),
        )?;
        debug!(
            "DeepL request id={} i_count={} timestamp={} {} -> {}",
            signed.id, signed.i_count, signed.timestamp, source_lang, target_lang
        );

        let mut request = HttpRequest::post(format!("https://{}/jsonrpc", config.host), signed.body)
            .headers(HEADERS)
            .proxy(&config.proxy_url);
        if !config.credential.is_empty() {
            request = request.header("Cookie", format!("dl_session={}", config.credential));
        }

        let response = transport::send(config.transport.as_ref(), ctx, request).await?;
        let body = read_body(&response, RATE_LIMIT_MESSAGE)?;
        let handled = response::parse(&body)?;

        let method = if config.credential.is_empty() {
            TranslationMethod::Free
        } else {
            TranslationMethod::Pro
        };

        Ok(
            Translated::new(handled.text, handled.source_lang.unwrap_or(source_lang), method)
                .with_alternatives(handled.alternatives),
        )
    }

    fn name(&self) -> &'static str {
        "deepl"
    }
}
