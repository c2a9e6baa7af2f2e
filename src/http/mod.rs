//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from request routing.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_301_response, build_304_response, build_404_response, build_405_response,
    build_options_response,
};
