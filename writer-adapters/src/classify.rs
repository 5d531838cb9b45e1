//! Maps non-2xx provider responses to error kinds and user facing messages.

use hyper::StatusCode;
use serde::Deserialize;
use writer_primitives::ErrorKind;

use crate::traits::AdapterError;

const MAX_RAW_DETAIL_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorPayload>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorPayload {
    Detailed {
        #[serde(default)]
        message: Option<String>,
    },
    Plain(String),
}

/// Returns the provider supplied error message, if one can be found.
///
/// Understands `{"error": {"message": ..}}`, `{"error": ".."}` and
/// `{"message": ..}`. Non-JSON bodies are returned trimmed and truncated.
pub(crate) fn provider_detail(body: &[u8]) -> Option<String> {
    if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(body) {
        let message = match envelope.error {
            Some(ErrorPayload::Detailed { message }) => message,
            Some(ErrorPayload::Plain(message)) => Some(message),
            None => None,
        }
        .or(envelope.message);
        return message
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());
    }

    let raw = String::from_utf8_lossy(body);
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let mut detail: String = raw.chars().take(MAX_RAW_DETAIL_CHARS).collect();
    if raw.chars().count() > MAX_RAW_DETAIL_CHARS {
        detail.push_str("...");
    }
    Some(detail)
}

/// Builds the error for a non-2xx response.
pub(crate) fn classify_status(provider: &str, status: StatusCode, body: &[u8]) -> AdapterError {
    let detail = provider_detail(body);
    let (kind, summary) = match status {
        StatusCode::BAD_REQUEST => (
            ErrorKind::BadRequest,
            format!("{provider} rejected the request as invalid (400 Bad Request)."),
        ),
        StatusCode::UNAUTHORIZED => (
            ErrorKind::Unauthorized,
            format!("{provider} rejected the API key (401 Unauthorized). Check that the key is correct."),
        ),
        StatusCode::FORBIDDEN => (
            ErrorKind::Forbidden,
            "The API key is not permitted to use this model (403 Forbidden).".to_owned(),
        ),
        StatusCode::TOO_MANY_REQUESTS => (
            ErrorKind::RateLimited,
            "Rate limit exceeded (429 Too Many Requests). Please wait a moment and try again."
                .to_owned(),
        ),
        other => (
            ErrorKind::ProviderError,
            format!("{provider} returned an error (HTTP {}).", other.as_u16()),
        ),
    };

    let message = match detail {
        Some(detail) => format!("{summary} Details: {detail}"),
        None => summary,
    };

    AdapterError::Status {
        status: status.as_u16(),
        kind,
        message,
    }
}
