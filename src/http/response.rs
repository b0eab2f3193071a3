//! Response construction for routing directives.
//!
//! # Responsibilities
//! - Turn redirect plans into 308 responses with Location and cookie
//! - Build the locale-selection Set-Cookie header
//! - Produce the not-found response

use axum::body::Body;
use axum::http::{header, HeaderValue, Response, StatusCode};

use crate::config::schema::CookieConfig;
use crate::routing::planner::RedirectPlan;
use crate::routing::registry::Locale;

/// Build the HTTP response for a redirect directive, reattaching the
/// original query string.
pub fn redirect_response(
    plan: &RedirectPlan,
    query: Option<&str>,
    cookie: &CookieConfig,
) -> Response<Body> {
    let location = match query {
        Some(q) => format!("{}?{}", plan.target, q),
        None => plan.target.clone(),
    };

    let mut builder = Response::builder()
        .status(StatusCode::from_u16(plan.status).unwrap_or(StatusCode::PERMANENT_REDIRECT));

    if let Ok(value) = HeaderValue::from_str(&location) {
        builder = builder.header(header::LOCATION, value);
    }
    if let Some(locale) = &plan.set_locale_cookie {
        builder = builder.header(header::SET_COOKIE, set_cookie_header(cookie, locale));
    }

    builder
        .body(Body::empty())
        .unwrap_or_else(|_| plain_response(StatusCode::INTERNAL_SERVER_ERROR, "redirect failed"))
}

/// Response for an unmatched path.
pub fn not_found_response() -> Response<Body> {
    plain_response(StatusCode::NOT_FOUND, "No matching route")
}

/// Response when the upstream renderer could not be reached.
pub fn bad_gateway_response() -> Response<Body> {
    plain_response(StatusCode::BAD_GATEWAY, "Upstream request failed")
}

/// The locale-selection cookie: long-lived, site-wide, not security
/// critical. The value is a plain locale code.
pub fn set_cookie_header(config: &CookieConfig, locale: &Locale) -> HeaderValue {
    let cookie = format!(
        "{}={}; Max-Age={}; Path=/; SameSite=Lax",
        config.name,
        locale.as_str(),
        config.max_age_secs
    );
    HeaderValue::from_str(&cookie)
        .unwrap_or_else(|_| HeaderValue::from_static("locale=invalid; Max-Age=0"))
}

fn plain_response(status: StatusCode, message: &'static str) -> Response<Body> {
    let mut response = Response::new(Body::from(message));
    *response.status_mut() = status;
    response
}
