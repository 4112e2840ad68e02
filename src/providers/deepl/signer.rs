//! Request signing for the `LMT_handle_texts` JSON-RPC call
//!
//! The web client ties a timestamp to the number of `i` characters in the
//! text and perturbs whitespace around `"method"` depending on the request
//! id. The server checks both silently.

use rand::Rng;
use serde::Serialize;

use crate::core::errors::Result;
use crate::core::language;

pub const METHOD: &str = "LMT_handle_texts";

const REQUEST_ALTERNATIVES: u32 = 3;

#[derive(Debug, Serialize)]
struct PostData<'a> {
    jsonrpc: &'static str,
    method: &'static str,
    id: i64,
    params: Params<'a>,
}

#[derive(Debug, Serialize)]
struct Params<'a> {
    splitting: &'static str,
    lang: Lang<'a>,
    texts: [TextItem<'a>; 1],
    timestamp: i64,
}

#[derive(Debug, Serialize)]
struct Lang<'a> {
    source_lang_user_selected: &'a str,
    target_lang: &'a str,
}

#[derive(Debug, Serialize)]
struct TextItem<'a> {
    text: &'a str,
    #[serde(rename = "requestAlternatives")]
    request_alternatives: u32,
}

/// A signed JSON-RPC body, built once and sent once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub id: i64,
    pub i_count: i64,
    pub timestamp: i64,
    pub body: String,
}

/// Request id in the range the web client uses
pub fn random_id() -> i64 {
    (rand::thread_rng().gen_range(0..99999) + 8300000) * 1000
}

/// Number of literal `i` characters in `text`
pub fn i_count(text: &str) -> i64 {
    text.matches('i').count() as i64
}

/// `now_ms` rounded down to a multiple of `i_count + 1`
pub fn timestamp(i_count: i64, now_ms: i64) -> i64 {
    if i_count == 0 {
        return now_ms;
    }
    let modulus = i_count + 1;
    now_ms - now_ms % modulus
}

/// Whitespace splice around `"method"` selected by the id class
pub fn mutate_body(id: i64, body: &str) -> String {
    if (id + 5) % 29 == 0 || (id + 3) % 13 == 0 {
        body.replacen(r#""method":""#, r#""method" : ""#, 1)
    } else {
        body.replacen(r#""method":""#, r#""method": ""#, 1)
    }
}

/// Upper-cased source language, detected from `text` when `from` is auto
pub fn resolve_source(text: &str, from: &str) -> Result<String> {
    if language::is_auto(from) {
        Ok(language::detect(text)?.to_ascii_uppercase())
    } else {
        Ok(from.to_ascii_uppercase())
    }
}

/// Build the mutated JSON-RPC body for one call
pub fn sign(text: &str, source_lang: &str, target_lang: &str, id: i64, now_ms: i64) -> Result<SignedRequest> {
    let i_count = i_count(text);
    let timestamp = timestamp(i_count, now_ms);

    let post = PostData {
        jsonrpc: "2.0",
        method: METHOD,
        id,
        params: Params {
            splitting: "newlines",
            lang: Lang {
                source_lang_user_selected: source_lang,
                target_lang,
            },
            texts: [TextItem {
                text,
                request_alternatives: REQUEST_ALTERNATIVES,
            }],
            timestamp,
        },
    };

    let body = mutate_body(id, &serde_json::to_string(&post)?);

    Ok(SignedRequest {
        id,
        i_count,
        timestamp,
        body,
    })
}
