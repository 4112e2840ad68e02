//! Core data models for translation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which backend produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranslationMethod {
    /// Unauthenticated batch-RPC endpoint
    Google,
    /// Session-gated endpoint without a session cookie
    Free,
    /// Session-gated endpoint with a `dl_session` cookie
    Pro,
}

impl fmt::Display for TranslationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationMethod::Google => write!(f, "Google"),
            TranslationMethod::Free => write!(f, "Free"),
            TranslationMethod::Pro => write!(f, "Pro"),
        }
    }
}

/// Detected source language
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateFromLanguage {
    pub did_you_mean: bool,
    pub iso: String,
}

/// Spelling correction of the input text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateFromText {
    pub auto_corrected: bool,
    pub value: Option<String>,
    pub did_you_mean: bool,
}

/// What the provider learned about the input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateFrom {
    pub language: TranslateFromLanguage,
    pub text: TranslateFromText,
}

/// Translation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translated {
    pub text: String,
    pub pronunciation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<String>,
    pub from: TranslateFrom,
    pub method: TranslationMethod,
}

impl Translated {
    /// Result carrying only the primary translation
    pub fn new(text: impl Into<String>, source_iso: impl Into<String>, method: TranslationMethod) -> Self {
        Self {
            text: text.into(),
            pronunciation: None,
            alternatives: Vec::new(),
            from: TranslateFrom {
                language: TranslateFromLanguage {
                    did_you_mean: false,
                    iso: source_iso.into(),
                },
                text: TranslateFromText::default(),
            },
            method,
        }
    }

    /// Attach alternatives, dropping empty entries
    pub fn with_alternatives<I, S>(mut self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alternatives = alternatives
            .into_iter()
            .map(Into::into)
            .filter(|alt| !alt.is_empty())
            .collect();
        self
    }

    /// Detected source language ISO code
    pub fn source_iso(&self) -> &str {
        &self.from.language.iso
    }
}

/// Parameters for [`crate::TranslatorRegistry::translate_with_params`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslateParams {
    pub text: String,
    /// Empty means auto-detect
    #[serde(default)]
    pub from: String,
    pub to: String,
}

impl TranslateParams {
    pub fn new(text: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            from: String::new(),
            to: to.into(),
        }
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }
}
