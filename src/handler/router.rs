//! Request routing dispatch module
//!
//! Entry point for HTTP request processing. Every request runs through the
//! same two stages: the MIME override, then the static-file resolver.

use crate::config::AppState;
use crate::handler::{mime_override, static_files};
use crate::http::{self, response};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{self, HeaderMap};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) URL path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_none_match: Option<&'a str>,
    pub if_modified_since: Option<&'a str>,
}

impl<'a> RequestContext<'a> {
    pub fn from_parts(parts: &'a Parts) -> Self {
        Self {
            path: parts.uri.path(),
            query: parts.uri.query(),
            is_head: parts.method == Method::HEAD,
            if_none_match: header_str(&parts.headers, &header::IF_NONE_MATCH),
            if_modified_since: header_str(&parts.headers, &header::IF_MODIFIED_SINCE),
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &header::HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let access_log = state.access_log_enabled();

    // Request bodies are never read
    let (parts, body) = req.into_parts();
    drop(body);
    logger::log_request(&parts.method, &parts.uri);

    let ctx = RequestContext::from_parts(&parts);

    // 1. MIME override, decided from the path before any file lookup
    let content_type_override = mime_override::content_type_override(ctx.path);

    // 2. Static-file resolution
    let mut resp = match check_http_method(&parts.method) {
        Some(early) => early,
        None => static_files::serve(&ctx, &state.static_root, &state.config.static_files).await,
    };

    if let Some(content_type) = content_type_override {
        response::set_content_type(&mut resp, content_type);
    }

    if access_log {
        let entry = build_access_entry(&parts, &resp, peer_addr, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(resp)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

fn build_access_entry(
    req: &Parts,
    resp: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method.to_string(),
        req.uri.path().to_string(),
    );
    entry.query = req.uri.query().map(ToString::to_string);
    entry.http_version = version_label(req.version).to_string();
    entry.status = resp.status().as_u16();
    entry.body_bytes = usize::try_from(resp.body().size_hint().exact().unwrap_or(0)).unwrap_or(usize::MAX);
    entry.content_type = header_str(resp.headers(), &header::CONTENT_TYPE).map(ToString::to_string);
    entry.referer = header_str(&req.headers, &header::REFERER).map(ToString::to_string);
    entry.user_agent = header_str(&req.headers, &header::USER_AGENT).map(ToString::to_string);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn state_for(root: &std::path::Path) -> Arc<AppState> {
        let mut config = Config::default();
        config.static_files.root = root.to_string_lossy().into_owned();
        config.logging.access_log = false;
        Arc::new(AppState::new(&config))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    async fn send(state: &Arc<AppState>, method: Method, uri: &str) -> Response<Full<Bytes>> {
        let req = Request::builder().method(method).uri(uri).body(()).unwrap();
        handle_request(req, Arc::clone(state), peer()).await.unwrap()
    }

    #[tokio::test]
    async fn test_override_applies_to_served_script() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log(1)").unwrap();
        let state = state_for(dir.path());

        let resp = send(&state, Method::GET, "/app.js").await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/javascript");
    }

    #[tokio::test]
    async fn test_override_applies_to_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(dir.path());

        let resp = send(&state, Method::GET, "/missing.js").await;
        assert_eq!(resp.status(), 404);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/javascript");

        let resp = send(&state, Method::GET, "/missing.wasm").await;
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/wasm");
    }

    #[tokio::test]
    async fn test_other_paths_keep_resolver_type() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.mjs"), "export {}").unwrap();
        let state = state_for(dir.path());

        let resp = send(&state, Method::GET, "/app.mjs").await;
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/javascript; charset=utf-8");

        let resp = send(&state, Method::GET, "/missing.txt").await;
        assert_eq!(resp.status(), 404);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/plain; charset=utf-8");
    }

    #[tokio::test]
    async fn test_query_string_does_not_affect_override() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("module.wasm"), [0u8, 97, 115, 109]).unwrap();
        let state = state_for(dir.path());

        let resp = send(&state, Method::GET, "/module.wasm?v=2").await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/wasm");
    }

    #[tokio::test]
    async fn test_method_checks() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(dir.path());

        let resp = send(&state, Method::POST, "/index.html").await;
        assert_eq!(resp.status(), 405);

        let resp = send(&state, Method::OPTIONS, "/").await;
        assert_eq!(resp.status(), 204);
        assert_eq!(resp.headers()[header::ALLOW], "GET, HEAD, OPTIONS");
    }

    #[test]
    fn test_access_entry_fields() {
        let req = Request::builder()
            .uri("/pkg/app.js?x=1")
            .header(header::USER_AGENT, "curl/8.0")
            .body(())
            .unwrap();
        let (parts, ()) = req.into_parts();
        let mut resp = http::build_404_response();
        response::set_content_type(&mut resp, "application/javascript");

        let entry = build_access_entry(&parts, &resp, peer(), Instant::now());
        assert_eq!(entry.remote_addr, "127.0.0.1");
        assert_eq!(entry.path, "/pkg/app.js");
        assert_eq!(entry.query.as_deref(), Some("x=1"));
        assert_eq!(entry.status, 404);
        assert_eq!(entry.body_bytes, "404 Not Found".len());
        assert_eq!(entry.content_type.as_deref(), Some("application/javascript"));
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.0"));
        assert!(entry.referer.is_none());
    }
}
