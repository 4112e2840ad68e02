//! Translator capability and the swappable default translator

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::core::errors::{Result, TranslationError};
use crate::core::language::{self, AUTO};
use crate::core::models::{TranslateParams, Translated};
use crate::providers::{deepl::DeepL, google::GoogleTranslate};

/// A translation backend
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `from` (or `"auto"`) to `to`
    ///
    /// Returns either a result with non-empty text or an error.
    async fn translate(
        &self,
        ctx: &CancellationToken,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<Translated>;

    /// Short backend name used in logs
    fn name(&self) -> &'static str;
}

/// Holds the currently active translator
///
/// Swaps replace the whole `Arc` under a write lock, so readers see either
/// the old or the new translator. The lock is never held across an await.
pub struct TranslatorRegistry {
    current: RwLock<Arc<dyn Translator>>,
}

impl TranslatorRegistry {
    pub fn new(initial: Arc<dyn Translator>) -> Self {
        Self {
            current: RwLock::new(initial),
        }
    }

    /// Replace the default translator
    pub fn set_default(&self, translator: Arc<dyn Translator>) {
        info!("Default translator set to {}", translator.name());
        *self.current.write() = translator;
    }

    /// The currently active translator
    pub fn get_default(&self) -> Arc<dyn Translator> {
        Arc::clone(&self.current.read())
    }

    /// Make a Google client the default
    pub fn use_google(&self, client: GoogleTranslate) {
        self.set_default(Arc::new(client));
    }

    /// Make a DeepL client the default
    pub fn use_deepl(&self, client: DeepL) {
        self.set_default(Arc::new(client));
    }

    /// Translate with auto-detected source language
    pub async fn translate(&self, ctx: &CancellationToken, text: &str, to: &str) -> Result<Translated> {
        validate_text(text)?;
        validate_target(to)?;
        self.get_default().translate(ctx, text, AUTO, to).await
    }

    /// Translate with explicit source and target languages
    pub async fn manual_translate(
        &self,
        ctx: &CancellationToken,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<Translated> {
        validate_text(text)?;
        if from.is_empty() {
            return Err(TranslationError::validation("source language is required"));
        }
        validate_source(from)?;
        validate_target(to)?;
        self.get_default().translate(ctx, text, from, to).await
    }

    /// Translate using a parameters struct; an empty `from` means auto
    pub async fn translate_with_params(
        &self,
        ctx: &CancellationToken,
        params: &TranslateParams,
    ) -> Result<Translated> {
        validate_text(&params.text)?;
        validate_target(&params.to)?;
        let from = if params.from.is_empty() {
            AUTO
        } else {
            validate_source(&params.from)?;
            params.from.as_str()
        };
        self.get_default().translate(ctx, &params.text, from, &params.to).await
    }
}

impl Default for TranslatorRegistry {
    fn default() -> Self {
        Self::new(Arc::new(GoogleTranslate::new()))
    }
}

impl fmt::Debug for TranslatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslatorRegistry")
            .field("current", &self.current.read().name())
            .finish()
    }
}

/// Translate with a specific translator instead of the registry default
pub async fn translate_with(
    ctx: &CancellationToken,
    translator: &dyn Translator,
    text: &str,
    to: &str,
) -> Result<Translated> {
    validate_text(text)?;
    validate_target(to)?;
    translator.translate(ctx, text, AUTO, to).await
}

fn validate_text(text: &str) -> Result<()> {
    if text.is_empty() {
        return Err(TranslationError::validation("text is required"));
    }
    Ok(())
}

fn validate_target(to: &str) -> Result<()> {
    if to.is_empty() {
        return Err(TranslationError::validation("target language is required"));
    }
    if !language::is_valid_tag(to) {
        return Err(TranslationError::validation("target language is not valid"));
    }
    Ok(())
}

fn validate_source(from: &str) -> Result<()> {
    if from.eq_ignore_ascii_case(AUTO) || language::is_valid_tag(from) {
        return Ok(());
    }
    Err(TranslationError::validation("source language is not valid"))
}
