//! gtranslate - machine translation through the Google Translate and DeepL
//! web endpoints, without their official SDKs.
//!
//! Each provider implements [`Translator`]; a [`TranslatorRegistry`] holds
//! the default one and offers validated convenience calls.

#![forbid(unsafe_code)]

pub mod core;
pub mod providers;

// Re-export key types for convenience
pub use crate::core::{
    config::{ClientSettings, ProviderConfig, ProviderKind},
    errors::{ErrorKind, Result, TranslationError},
    models::{TranslateFrom, TranslateFromLanguage, TranslateFromText, TranslateParams, Translated, TranslationMethod},
    registry::{translate_with, Translator, TranslatorRegistry},
    transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport},
};

pub use providers::{deepl::DeepL, google::GoogleTranslate};

pub use tokio_util::sync::CancellationToken;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
