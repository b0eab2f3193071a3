//! Request identification and header extraction.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) as early as possible
//! - Pull the locale cookie and Accept-Language values out of a request
//!
//! # Design Decisions
//! - The request ID is set and propagated by tower-http layers; only the
//!   ID generator lives here
//! - Cookie parsing is a plain header scan; the cookie carries a single
//!   locale code and nothing else

use axum::http::header::HeaderMap;
use axum::http::{HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// UUID v4 request-id generator for tower-http's set/propagate layers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Extract the value of `name` from the request's Cookie header(s).
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(axum::http::header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key.trim() == name).then(|| value.trim().to_string())
        })
        .next()
}

/// The Accept-Language header as a string, if present and readable.
pub fn accept_language(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::{ACCEPT_LANGUAGE, COOKIE};

    #[test]
    fn finds_cookie_among_several() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; locale=de; session=abc"),
        );
        assert_eq!(cookie_value(&headers, "locale"), Some("de".to_string()));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn reads_accept_language() {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("de, en;q=0.8"));
        assert_eq!(accept_language(&headers), Some("de, en;q=0.8"));
    }
}
