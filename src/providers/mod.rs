//! Provider adapters implementing [`crate::Translator`]

pub mod deepl;
pub mod google;

use tracing::warn;

use crate::core::decoder::decode_body;
use crate::core::errors::{Result, TranslationError};
use crate::core::transport::HttpResponse;

/// Check the status, then decode the body by its `Content-Encoding`
pub(crate) fn read_body(response: &HttpResponse, rate_limit_message: &str) -> Result<Vec<u8>> {
    if response.status == 429 {
        warn!("Rate limited by provider");
        return Err(TranslationError::RateLimitError {
            message: rate_limit_message.to_string(),
        });
    }

    if !response.is_success() {
        warn!("Provider returned status {}", response.status);
        return Err(TranslationError::ApiError {
            status: response.status,
            message: format!("request failed with status code: {}", response.status),
        });
    }

    decode_body(response.header("content-encoding"), &response.body)
}
