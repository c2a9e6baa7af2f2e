//! HTTP response building module
//!
//! Provides builders for the status codes the static-file resolver can produce.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{self, HeaderValue};
use hyper::Response;

const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str, last_modified: &str, cache_control: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(304)
        .header(header::ETAG, etag)
        .header(header::LAST_MODIFIED, last_modified)
        .header(header::CACHE_CONTROL, cache_control)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from_static(b"404 Not Found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from_static(b"404 Not Found")))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(header::ALLOW, ALLOWED_METHODS)
        .body(Full::new(Bytes::from_static(b"405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from_static(b"405 Method Not Allowed")))
        })
}

/// Build OPTIONS response
pub fn build_options_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(204)
        .header(header::ALLOW, ALLOWED_METHODS)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 301 redirect response (used to append a trailing slash to directories)
pub fn build_301_response(location: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(301)
        .header(header::LOCATION, location)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(format!("Redirecting to {location}"))))
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            build_404_response()
        })
}

/// Cache headers attached to every served file
pub struct FileHeaders<'a> {
    pub content_type: &'a str,
    pub etag: &'a str,
    pub last_modified: &'a str,
    pub cache_control: &'a str,
}

/// Build 200 response for a served file; `HEAD` keeps the length but drops the body
pub fn build_file_response(data: Bytes, headers: &FileHeaders<'_>, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(200)
        .header(header::CONTENT_TYPE, headers.content_type)
        .header(header::CONTENT_LENGTH, content_length)
        .header(header::ETAG, headers.etag)
        .header(header::LAST_MODIFIED, headers.last_modified)
        .header(header::CACHE_CONTROL, headers.cache_control)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Replace the `Content-Type` of an already built response
pub fn set_content_type(response: &mut Response<Full<Bytes>>, content_type: &'static str) {
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_404_response() {
        let resp = build_404_response();
        assert_eq!(resp.status(), 404);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/plain; charset=utf-8");
    }

    #[test]
    fn test_405_lists_allowed_methods() {
        let resp = build_405_response();
        assert_eq!(resp.status(), 405);
        assert_eq!(resp.headers()[header::ALLOW], ALLOWED_METHODS);
    }

    #[test]
    fn test_head_file_response_keeps_length() {
        let headers = FileHeaders {
            content_type: "text/css; charset=utf-8",
            etag: "\"1\"",
            last_modified: "Sun, 06 Nov 1994 08:49:37 GMT",
            cache_control: "public, max-age=0",
        };
        let resp = build_file_response(Bytes::from_static(b"body{}"), &headers, true);
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()[header::CONTENT_LENGTH], "6");
        assert_eq!(resp.headers()[header::ETAG], "\"1\"");
    }

    #[test]
    fn test_set_content_type_replaces_existing() {
        let mut resp = build_404_response();
        set_content_type(&mut resp, "application/wasm");
        assert_eq!(resp.headers().get_all(header::CONTENT_TYPE).iter().count(), 1);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/wasm");
    }
}
