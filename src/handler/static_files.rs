//! Static file serving module
//!
//! Maps a request path to a file under the static root and builds the
//! response: file bytes, a directory redirect, a conditional 304, or 404.

use crate::config::StaticFilesConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, response::FileHeaders};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use percent_encoding::percent_decode_str;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

/// Outcome of mapping a request path onto the static root
#[derive(Debug)]
pub enum Resolved {
    /// Regular file inside the root (canonical path) and its metadata
    File { path: PathBuf, metadata: Metadata },
    /// Directory requested without a trailing slash
    Redirect,
    NotFound,
}

/// Serve a request from the static root
pub async fn serve(
    ctx: &RequestContext<'_>,
    root: &Path,
    config: &StaticFilesConfig,
) -> Response<Full<Bytes>> {
    match resolve(root, ctx.path, &config.index_files).await {
        Resolved::File { path, metadata } => serve_file(ctx, &path, &metadata, config.max_age).await,
        Resolved::Redirect => {
            // Repeated leading slashes would make a protocol-relative Location
            let path = ctx.path.trim_start_matches('/');
            let location = match ctx.query {
                Some(q) => format!("/{path}/?{q}"),
                None => format!("/{path}/"),
            };
            http::build_301_response(&location)
        }
        Resolved::NotFound => http::build_404_response(),
    }
}

/// Resolve a raw request path to a file under `root`
pub async fn resolve(root: &Path, request_path: &str, index_files: &[String]) -> Resolved {
    let Ok(decoded) = percent_decode_str(request_path).decode_utf8() else {
        return Resolved::NotFound;
    };

    let mut file_path = root.to_path_buf();
    for segment in decoded.split('/').filter(|s| !s.is_empty()) {
        // Rejects "..", "." and dotfiles
        if segment.starts_with('.') || segment.contains(['\\', '\0']) {
            return Resolved::NotFound;
        }
        file_path.push(segment);
    }

    let root_canonical = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static root not found or inaccessible '{}': {e}",
                root.display()
            ));
            return Resolved::NotFound;
        }
    };

    // File not found is common (404), no need to log
    let Ok(mut metadata) = fs::metadata(&file_path).await else {
        return Resolved::NotFound;
    };

    if metadata.is_dir() {
        if !decoded.ends_with('/') {
            return Resolved::Redirect;
        }
        let mut index = None;
        for name in index_files {
            let candidate = file_path.join(name);
            match fs::metadata(&candidate).await {
                Ok(m) if m.is_file() => {
                    index = Some((candidate, m));
                    break;
                }
                _ => {}
            }
        }
        match index {
            Some((p, m)) => {
                file_path = p;
                metadata = m;
            }
            None => return Resolved::NotFound,
        }
    } else if !metadata.is_file() || decoded.ends_with('/') {
        return Resolved::NotFound;
    }

    let Ok(file_canonical) = fs::canonicalize(&file_path).await else {
        return Resolved::NotFound;
    };
    if !file_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path outside static root blocked: {request_path} -> {}",
            file_canonical.display()
        ));
        return Resolved::NotFound;
    }

    Resolved::File {
        path: file_canonical,
        metadata,
    }
}

/// Read a resolved file and build the 200 / 304 response
async fn serve_file(
    ctx: &RequestContext<'_>,
    file_path: &Path,
    metadata: &Metadata,
    max_age: u64,
) -> Response<Full<Bytes>> {
    let content = match fs::read(file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            return http::build_404_response();
        }
    };
    let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

    let etag = cache::generate_etag(&content);
    let last_modified = cache::format_http_date(modified);
    let cache_control = format!("public, max-age={max_age}");

    // If-None-Match takes precedence over If-Modified-Since
    let not_modified = if ctx.if_none_match.is_some() {
        cache::check_etag_match(ctx.if_none_match, &etag)
    } else {
        cache::check_not_modified_since(ctx.if_modified_since, modified)
    };
    if not_modified {
        return http::build_304_response(&etag, &last_modified, &cache_control);
    }

    let headers = FileHeaders {
        content_type: mime::content_type_for(file_path),
        etag: &etag,
        last_modified: &last_modified,
        cache_control: &cache_control,
    };
    http::response::build_file_response(Bytes::from(content), &headers, ctx.is_head)
}
