//! Landing-page bootstrap for the batchexecute endpoint

use regex::Regex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::decoder::decode_body;
use crate::core::errors::{Result, TranslationError};
use crate::core::transport::{self, HttpRequest, HttpTransport};

/// Page key holding the `f.sid` query value
pub const SESSION_ID_KEY: &str = "FdrFJe";
/// Page key holding the `bl` (build label) query value
pub const BUILD_LABEL_KEY: &str = "cfb2h";
/// Page key holding the `at` anti-forgery token
pub const AT_KEY: &str = "SNlM0e";

const HEADERS: &[(&str, &str)] = &[
    ("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9"),
    ("Accept-Language", "en-US,en;q=0.9,id;q=0.8"),
    ("Sec-Ch-Ua", r#".Not/A)Brand";v="99", "Google Chrome";v="103", "Chromium";v="103"#),
    ("Sec-Ch-Ua-Mobile", "?0"),
    ("Sec-Ch-Ua-Platform", r#""Windows""#),
    ("Sec-Fetch-Dest", "document"),
    ("Sec-Fetch-User", "?1"),
    ("User-Agent", "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/103.0.0.0 Safari/537.36"),
];

/// Short-lived tokens scraped from the landing page, used by one call only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub session_id: String,
    pub build_label: String,
    /// Only present on some pages
    pub at: Option<String>,
}

impl SessionToken {
    /// Pull the tokens out of raw page text
    ///
    /// An empty value counts as present; the provider may still reject it.
    pub fn from_page(page: &str) -> Result<Self> {
        let session_id = extract(SESSION_ID_KEY, page)
            .ok_or_else(|| TranslationError::session(format!("{} not found in page", SESSION_ID_KEY)))?;
        let build_label = extract(BUILD_LABEL_KEY, page)
            .ok_or_else(|| TranslationError::session(format!("{} not found in page", BUILD_LABEL_KEY)))?;

        if session_id.is_empty() || build_label.is_empty() {
            warn!("Session token present but empty");
        }

        Ok(Self {
            session_id,
            build_label,
            at: extract(AT_KEY, page),
        })
    }
}

/// Value of `"<key>":"<value>"` in `page`
pub fn extract(key: &str, page: &str) -> Option<String> {
    let pattern = format!(r#""{}":"(.*?)""#, regex::escape(key));
    let re = Regex::new(&pattern).ok()?;
    re.captures(page)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Fetch the landing page at `base_url` and extract a fresh [`SessionToken`]
pub async fn bootstrap(
    transport: &dyn HttpTransport,
    ctx: &CancellationToken,
    base_url: &str,
    proxy_url: &str,
) -> Result<SessionToken> {
    let request = HttpRequest::get(base_url).headers(HEADERS).proxy(proxy_url);

    let response = match transport::send(transport, ctx, request).await {
        Ok(response) => response,
        Err(TranslationError::Cancelled) => return Err(TranslationError::Cancelled),
        Err(e) => return Err(TranslationError::session(format!("bad network: {}", e))),
    };

    if !response.is_success() {
        return Err(TranslationError::session(format!(
            "request failed with status code {}",
            response.status
        )));
    }

    let body = decode_body(response.header("content-encoding"), &response.body)
        .map_err(|e| TranslationError::session(e.to_string()))?;
    let page = String::from_utf8_lossy(&body);

    let token = SessionToken::from_page(&page)?;
    debug!("Bootstrapped session f.sid={} bl={}", token.session_id, token.build_label);
    Ok(token)
}
