//! The one semantic behavior of this server: always 404.
//!
//! Installed as the router fallback, so it answers every path that is not
//! `/healthz` or `/metrics`, regardless of method.

use std::time::Instant;

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode, Version},
    response::{IntoResponse, Response},
};

use crate::app_state::AppState;

/// Fixed response body. Kept as a literal so the bytes on the wire match
/// the upstream proxy error format exactly.
pub const NOT_FOUND_BODY: &str = "{\"error\": \"Not found\"}";

/// Answer any unmatched request with 404 and the fixed JSON body.
///
/// The headers and body make us look very similar to a normal ESI 404
/// error, without tying into the error limit system: the rate-limit headers
/// are static literals, not behavior. Records one counter increment and one
/// duration observation, labeled with the negotiated protocol version.
pub async fn not_found(State(state): State<AppState>, version: Version) -> Response {
    let start = Instant::now();

    let mut res = (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response();
    let headers = res.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type,Authorization,X-User-Agent"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static(
            "Content-Type,Warning,X-Pages,X-ESI-Error-Limit-Remain,X-ESI-Error-Limit-Reset",
        ),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static("600"),
    );
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000"),
    );

    let proto = proto_label(version);
    state.metrics().request_count.inc(proto);
    state
        .metrics()
        .request_duration
        .observe(proto, start.elapsed());

    res
}

/// Protocol version as a metric label, always "major.minor" ("1.1",
/// "2.0", ...).
fn proto_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_11 => "1.1",
        Version::HTTP_2 => "2.0",
        Version::HTTP_3 => "3.0",
        _ => "unknown",
    }
}
