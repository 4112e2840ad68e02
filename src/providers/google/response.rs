//! Decoding of the batchexecute response grammar
//!
//! The body is `)]}'\n\n` followed by newline-delimited chunks. Line 1 is a
//! JSON array whose element `[0][2]` is a string holding a second JSON
//! document. Everything of interest sits at fixed positions inside that
//! inner document.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::core::errors::{Result, TranslationError};
use crate::core::models::TranslateFrom;

/// Length of the `)]}'\n\n` framing prefix
pub const FRAME_PREFIX_LEN: usize = 6;
/// Line holding the RPC envelope once the prefix is stripped
pub const ENVELOPE_LINE: usize = 1;
/// Envelope path of the inner JSON-in-a-string document
pub const INNER_DOCUMENT: &[usize] = &[0, 2];

/// Array of sentences; each sentence's first element is a fragment
pub const SENTENCES: &[usize] = &[1, 0, 0, 5];
/// Whole translation, used when the sentence list is absent
pub const SINGLE_TEXT: &[usize] = &[1, 0, 0, 0];
pub const PRONUNCIATION: &[usize] = &[1, 0, 0, 1];
pub const SOURCE_ISO: &[usize] = &[1, 3];
/// Input after automatic correction
pub const AUTO_CORRECTED: &[usize] = &[0, 0];
/// "Did you mean" suggestion, may carry HTML markup
pub const DID_YOU_MEAN: &[usize] = &[0, 1, 0, 0, 1];

/// Fields extracted from a batchexecute response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResponse {
    pub text: String,
    pub pronunciation: Option<String>,
    /// Empty when the provider omitted it
    pub source_iso: String,
    pub from: TranslateFrom,
}

fn at<'a>(value: &'a Value, path: &[usize]) -> Option<&'a Value> {
    path.iter().try_fold(value, |node, &index| node.get(index))
}

fn non_empty_str<'a>(value: &'a Value, path: &[usize]) -> Option<&'a str> {
    at(value, path)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn strip_tags(text: &str) -> String {
    static TAGS: OnceLock<Option<Regex>> = OnceLock::new();
    match TAGS.get_or_init(|| Regex::new(r"<.*?>").ok()) {
        Some(re) => re.replace_all(text, "").into_owned(),
        None => text.to_string(),
    }
}

/// Strip the framing and return the inner document
pub fn inner_document(body: &str) -> Result<Value> {
    let unframed = body
        .get(FRAME_PREFIX_LEN..)
        .ok_or_else(|| TranslationError::invalid_response("response shorter than its framing prefix"))?;

    let line = unframed
        .split('\n')
        .nth(ENVELOPE_LINE)
        .ok_or_else(|| TranslationError::invalid_response("missing envelope line"))?;

    let envelope: Value = serde_json::from_str(line)
        .map_err(|e| TranslationError::invalid_response(format!("envelope is not JSON: {}", e)))?;

    let inner = non_empty_str(&envelope, INNER_DOCUMENT).ok_or_else(|| {
        TranslationError::provider(
            503,
            "request on google translate api isn't working, please check your parameter",
        )
    })?;

    serde_json::from_str(inner)
        .map_err(|e| TranslationError::invalid_response(format!("inner document is not JSON: {}", e)))
}

/// Join the sentence fragments with single spaces
fn translated_text(data: &Value) -> String {
    let mut text = String::new();
    if let Some(sentences) = at(data, SENTENCES).and_then(Value::as_array) {
        for fragment in sentences.iter().filter_map(|s| s.get(0).and_then(Value::as_str)) {
            text.push_str(fragment);
            text.push(' ');
        }
    }

    let text = text.trim();
    if text.is_empty() {
        non_empty_str(data, SINGLE_TEXT).unwrap_or_default().trim().to_string()
    } else {
        text.to_string()
    }
}

fn correction(data: &Value) -> TranslateFrom {
    let mut from = TranslateFrom::default();

    if let Some(corrected) = non_empty_str(data, AUTO_CORRECTED) {
        from.text.auto_corrected = true;
        from.language.did_you_mean = true;
        from.text.value = Some(corrected.to_string());
    } else if let Some(suggestion) = non_empty_str(data, DID_YOU_MEAN) {
        from.text.did_you_mean = true;
        from.text.value = Some(strip_tags(suggestion));
    }

    from
}

/// Parse a decoded batchexecute body
pub fn parse(body: &str) -> Result<BatchResponse> {
    let data = inner_document(body)?;

    let text = translated_text(&data);
    if text.is_empty() {
        return Err(TranslationError::provider(503, "translation failed"));
    }

    let source_iso = non_empty_str(&data, SOURCE_ISO).unwrap_or_default().to_string();
    let mut from = correction(&data);
    from.language.iso = source_iso.clone();

    Ok(BatchResponse {
        text,
        pronunciation: non_empty_str(&data, PRONUNCIATION).map(str::to_string),
        source_iso,
        from,
    })
}
