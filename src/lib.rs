//! Static asset server
//!
//! Serves files from a static root over HTTP/1.1 and forces the
//! `Content-Type` of `.js` and `.wasm` paths.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
