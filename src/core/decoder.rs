//! Response body decoding driven by `Content-Encoding`

use std::io::Read;

use flate2::read::{DeflateDecoder, GzDecoder};

use crate::core::errors::{Result, TranslationError};

/// Decompression strategy for a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Identity,
    Gzip,
    Deflate,
    Brotli,
}

impl ContentEncoding {
    /// Unknown or absent labels fall back to pass-through
    pub fn from_header(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("gzip") | Some("x-gzip") => ContentEncoding::Gzip,
            Some("deflate") => ContentEncoding::Deflate,
            Some("br") => ContentEncoding::Brotli,
            _ => ContentEncoding::Identity,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ContentEncoding::Identity => "identity",
            ContentEncoding::Gzip => "gzip",
            ContentEncoding::Deflate => "deflate",
            ContentEncoding::Brotli => "br",
        }
    }
}

/// Decode `body` according to the `Content-Encoding` header value
pub fn decode_body(content_encoding: Option<&str>, body: &[u8]) -> Result<Vec<u8>> {
    let encoding = ContentEncoding::from_header(content_encoding);
    let mut decoded = Vec::new();

    let read = match encoding {
        ContentEncoding::Identity => return Ok(body.to_vec()),
        ContentEncoding::Gzip => GzDecoder::new(body).read_to_end(&mut decoded),
        ContentEncoding::Deflate => DeflateDecoder::new(body).read_to_end(&mut decoded),
        ContentEncoding::Brotli => brotli::Decompressor::new(body, 4096).read_to_end(&mut decoded),
    };

    read.map_err(|e| TranslationError::DecodeError {
        encoding: encoding.label().to_string(),
        message: e.to_string(),
    })?;

    Ok(decoded)
}
