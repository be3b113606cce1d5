//! HTTP response construction.

use bytes::Bytes;
use gosd_core::{ApiError, Success};
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderValue, Response, StatusCode};
use http_body_util::Full;
use hyper::body::Body;

/// Response type produced by the server.
pub type HttpResponse = Response<Full<Bytes>>;

const JSON: &str = "application/json";
const PLAIN_TEXT: &str = "text/plain; charset=utf-8";

/// Last-resort body when even the error envelope cannot be rendered.
const INTERNAL_FALLBACK: &str =
    r#"{"code":500,"message":"Internal server error","version":"1.0"}"#;

fn build(status: StatusCode, content_type: &str, body: impl Into<Bytes>) -> HttpResponse {
    let body = Full::new(body.into());
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, content_type)
        .body(body.clone())
        .unwrap_or_else(|_| {
            let mut response = Response::new(body);
            *response.status_mut() = status;
            response
        })
}

/// Builds a JSON response from an already serialised body.
pub fn json_response(status: StatusCode, body: impl Into<Bytes>) -> HttpResponse {
    build(status, JSON, body)
}

/// Renders `error` as its status code and JSON envelope.
pub fn error_response(error: &ApiError) -> HttpResponse {
    let status = error.status_code();
    match error.to_envelope().to_json() {
        Ok(body) => json_response(status, body),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialise error envelope");
            json_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_FALLBACK)
        }
    }
}

/// Renders a successful handler result as `200 OK`.
pub fn success_response(success: &Success) -> HttpResponse {
    match success.to_body() {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialise response body");
            error_response(&ApiError::internal(e.to_string()))
        }
    }
}

/// The reply for anything outside the API prefix.
pub fn forbidden() -> HttpResponse {
    build(StatusCode::FORBIDDEN, PLAIN_TEXT, "403 Forbidden")
}

/// Drops the body of a `HEAD` reply, keeping its status and headers.
///
/// `Content-Length` still reports the size the `GET` body would have.
pub fn without_body(response: HttpResponse) -> HttpResponse {
    let (mut parts, body) = response.into_parts();
    if let Some(len) = body.size_hint().exact() {
        parts.headers.insert(CONTENT_LENGTH, HeaderValue::from(len));
    }
    Response::from_parts(parts, Full::new(Bytes::new()))
}
