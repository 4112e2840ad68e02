//! Configuration management

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::core::errors::{Result, TranslationError};
use crate::core::registry::Translator;
use crate::core::transport::{HttpTransport, ReqwestTransport, DEFAULT_TIMEOUT_MS};
use crate::providers::{deepl::DeepL, google::GoogleTranslate};

/// Values read together by a single translate call
#[derive(Debug, Clone)]
pub struct ConfigSnapshot {
    pub host: String,
    pub proxy_url: String,
    pub credential: String,
    pub transport: Arc<dyn HttpTransport>,
}

/// Per-client mutable settings behind one reader/writer lock
///
/// An empty proxy URL means no proxy, an empty credential means none.
pub struct ProviderConfig {
    inner: RwLock<ConfigSnapshot>,
}

impl ProviderConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            inner: RwLock::new(ConfigSnapshot {
                host: host.into(),
                proxy_url: String::new(),
                credential: String::new(),
                transport: Arc::new(ReqwestTransport::default()),
            }),
        }
    }

    pub fn host(&self) -> String {
        self.inner.read().host.clone()
    }

    pub fn set_host(&self, host: impl Into<String>) {
        self.inner.write().host = host.into();
    }

    pub fn proxy_url(&self) -> String {
        self.inner.read().proxy_url.clone()
    }

    pub fn set_proxy_url(&self, proxy_url: impl Into<String>) {
        self.inner.write().proxy_url = proxy_url.into();
    }

    pub fn credential(&self) -> String {
        self.inner.read().credential.clone()
    }

    pub fn set_credential(&self, credential: impl Into<String>) {
        self.inner.write().credential = credential.into();
    }

    pub fn transport(&self) -> Arc<dyn HttpTransport> {
        Arc::clone(&self.inner.read().transport)
    }

    pub fn set_transport(&self, transport: Arc<dyn HttpTransport>) {
        self.inner.write().transport = transport;
    }

    /// Every field as written by one prior writer
    pub fn snapshot(&self) -> ConfigSnapshot {
        self.inner.read().clone()
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("ProviderConfig")
            .field("host", &inner.host)
            .field("proxy_url", &inner.proxy_url)
            .field("credential", &if inner.credential.is_empty() { "" } else { "***" })
            .finish()
    }
}

/// Backend selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Google,
    Deepl,
}

impl std::str::FromStr for ProviderKind {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(ProviderKind::Google),
            "deepl" => Ok(ProviderKind::Deepl),
            other => Err(TranslationError::ConfigError {
                message: format!("unknown provider: {}", other),
            }),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Google => write!(f, "google"),
            ProviderKind::Deepl => write!(f, "deepl"),
        }
    }
}

/// Settings for building a translator, loadable from env or a JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    #[serde(default)]
    pub provider: ProviderKind,
    /// `None` keeps the provider's default host
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub proxy_url: String,
    /// DeepL `dl_session` cookie
    #[serde(default)]
    pub dl_session: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Google,
            host: None,
            proxy_url: String::new(),
            dl_session: String::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ClientSettings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let provider = match std::env::var("GTRANSLATE_PROVIDER") {
            Ok(value) => value.parse()?,
            Err(_) => ProviderKind::default(),
        };

        let timeout_ms = std::env::var("GTRANSLATE_TIMEOUT_MS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_MS.to_string())
            .parse::<u64>()
            .map_err(|e| TranslationError::ConfigError {
                message: format!("GTRANSLATE_TIMEOUT_MS: {}", e),
            })?;

        Ok(Self {
            provider,
            host: std::env::var("GTRANSLATE_HOST").ok().filter(|h| !h.is_empty()),
            proxy_url: std::env::var("GTRANSLATE_PROXY_URL").unwrap_or_default(),
            dl_session: std::env::var("DEEPL_SESSION").unwrap_or_default(),
            timeout_ms,
        })
    }

    /// Load from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| TranslationError::ConfigError {
            message: format!("{}: {}", path.display(), e),
        })?;
        let settings: Self = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(TranslationError::ConfigError {
                message: "timeout_ms must be greater than 0".to_string(),
            });
        }

        if matches!(&self.host, Some(host) if host.trim().is_empty()) {
            return Err(TranslationError::ConfigError {
                message: "host must not be empty".to_string(),
            });
        }

        if !self.proxy_url.is_empty() && url::Url::parse(&self.proxy_url).is_err() {
            return Err(TranslationError::ConfigError {
                message: format!("invalid proxy url: {}", self.proxy_url),
            });
        }

        Ok(())
    }

    /// Build the configured provider
    pub fn build_translator(&self) -> Result<Arc<dyn Translator>> {
        self.validate()?;

        let transport: Arc<dyn HttpTransport> =
            Arc::new(ReqwestTransport::new(Duration::from_millis(self.timeout_ms))?);

        let translator: Arc<dyn Translator> = match self.provider {
            ProviderKind::Google => {
                let mut client = GoogleTranslate::new()
                    .with_proxy_url(self.proxy_url.clone())
                    .with_transport(transport);
                if let Some(host) = &self.host {
                    client = client.with_host(host.clone());
                }
                Arc::new(client)
            }
            ProviderKind::Deepl => {
                let mut client = DeepL::new()
                    .with_proxy_url(self.proxy_url.clone())
                    .with_dl_session(self.dl_session.clone())
                    .with_transport(transport);
                if let Some(host) = &self.host {
                    client = client.with_host(host.clone());
                }
                Arc::new(client)
            }
        };

        info!("Built {} translator", self.provider);
        Ok(translator)
    }
}
