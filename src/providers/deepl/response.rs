//! Parsing of `LMT_handle_texts` responses

use serde_json::Value;

use crate::core::errors::{Result, TranslationError};

/// Translation fields read from a JSON-RPC result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandledTexts {
    pub text: String,
    pub alternatives: Vec<String>,
    /// `result.lang`, when the provider reports it
    pub source_lang: Option<String>,
}

/// Parse a decoded response body
pub fn parse(body: &[u8]) -> Result<HandledTexts> {
    let json: Value = serde_json::from_slice(body)
        .map_err(|e| TranslationError::invalid_response(format!("response is not JSON: {}", e)))?;

    if let Some(error) = json.get("error").filter(|e| !e.is_null()) {
        let message = error["message"].as_str().unwrap_or_default();
        return Err(TranslationError::provider(503, message));
    }

    let first = json["result"]["texts"]
        .get(0)
        .ok_or_else(|| TranslationError::provider(503, "Translation failed"))?;

    let text = first["text"]
        .as_str()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| TranslationError::provider(503, "Translation failed"))?
        .to_string();

    let alternatives = first["alternatives"]
        .as_array()
        .map(|alts| {
            alts.iter()
                .filter_map(|alt| alt["text"].as_str())
                .filter(|alt| !alt.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let source_lang = json["result"]["lang"]
        .as_str()
        .filter(|lang| !lang.is_empty())
        .map(str::to_string);

    Ok(HandledTexts {
        text,
        alternatives,
        source_lang,
    })
}
