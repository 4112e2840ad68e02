//! Language tag validation and language detection

use isolang::Language;
use language_tags::LanguageTag;

use crate::core::errors::{Result, TranslationError};

/// Source language value that asks the provider to detect the language
pub const AUTO: &str = "auto";

/// True when `lang` asks for auto-detection
pub fn is_auto(lang: &str) -> bool {
    lang.is_empty() || lang.eq_ignore_ascii_case(AUTO)
}

/// Withdrawn ISO 639-1 codes that Google Translate still uses
const LEGACY_CODES: &[&str] = &["iw", "in", "ji", "jw"];

/// Parse `tag` as a BCP 47 tag whose primary subtag is a known ISO 639 code
///
/// Extension and private-use subtags are accepted and left to the provider.
pub fn parse_tag(tag: &str) -> Result<LanguageTag> {
    let parsed = LanguageTag::parse(tag)
        .map_err(|e| TranslationError::validation(format!("{}: {}", tag, e)))?;

    let primary = parsed.primary_language().to_ascii_lowercase();
    let known = match primary.len() {
        2 => Language::from_639_1(&primary).is_some() || LEGACY_CODES.contains(&primary.as_str()),
        3 => Language::from_639_3(&primary).is_some(),
        _ => false,
    };
    if !known {
        return Err(TranslationError::validation(format!(
            "{}: unknown language {}",
            tag, primary
        )));
    }

    Ok(parsed)
}

/// Whether `tag` is a usable language tag
pub fn is_valid_tag(tag: &str) -> bool {
    parse_tag(tag).is_ok()
}

/// whatlang codes with no direct ISO 639-1 mapping in isolang
const DETECTION_OVERRIDES: &[(&str, &str)] = &[("cmn", "zh"), ("pes", "fa")];

/// Detect the language of `text` and return its ISO 639-1 code (lower case)
pub fn detect(text: &str) -> Result<String> {
    let info = whatlang::detect(text)
        .ok_or_else(|| TranslationError::validation("unable to detect the source language"))?;
    let code = info.lang().code();

    if let Some((_, iso)) = DETECTION_OVERRIDES.iter().find(|(from, _)| *from == code) {
        return Ok(iso.to_string());
    }

    Language::from_639_3(code)
        .and_then(|lang| lang.to_639_1())
        .map(str::to_string)
        .ok_or_else(|| {
            TranslationError::validation(format!("no ISO 639-1 code for detected language {}", code))
        })
}
