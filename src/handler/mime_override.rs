//! MIME override stage
//!
//! Runs before the static-file resolver and decides, from the request path
//! alone, whether the response `Content-Type` must be forced.

/// Suffix → content type, first match wins
pub const MIME_OVERRIDES: [(&str, &str); 2] = [
    (".js", "application/javascript"),
    (".wasm", "application/wasm"),
];

/// Content type to force for `path`, if any
///
/// Literal, case-sensitive suffix match on the raw request path (query excluded).
pub fn content_type_override(path: &str) -> Option<&'static str> {
    MIME_OVERRIDES
        .iter()
        .find(|(suffix, _)| path.ends_with(suffix))
        .map(|&(_, content_type)| content_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;

    #[test]
    fn test_js_suffix() {
        assert_eq!(content_type_override("/app.js"), Some("application/javascript"));
        assert_eq!(content_type_override("/pkg/nested/game.js"), Some("application/javascript"));
        assert_eq!(content_type_override("/missing.js"), Some("application/javascript"));
    }

    #[test]
    fn test_wasm_suffix() {
        assert_eq!(content_type_override("/module.wasm"), Some("application/wasm"));
        assert_eq!(content_type_override("/pkg/farm_bg.wasm"), Some("application/wasm"));
    }

    #[test]
    fn test_other_paths_untouched() {
        for path in [
            "/",
            "/index.html",
            "/missing.txt",
            "/app.mjs",
            "/data.json",
            "/app.JS",
            "/module.WASM",
            "/app.js/",
            "/app.js.map",
            "/js",
        ] {
            assert_eq!(content_type_override(path), None, "path {path}");
        }
    }

    #[test]
    fn test_override_is_stable() {
        let first = content_type_override("/module.wasm");
        let second = content_type_override("/module.wasm");
        assert_eq!(first, second);
    }

    #[test]
    fn test_overrides_are_valid_header_values() {
        for (suffix, content_type) in MIME_OVERRIDES {
            assert!(suffix.starts_with('.'));
            assert!(HeaderValue::from_str(content_type).is_ok());
            let (top, sub) = content_type.split_once('/').unwrap();
            assert!(!top.is_empty() && !sub.is_empty());
        }
    }
}
