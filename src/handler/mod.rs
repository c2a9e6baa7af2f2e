//! Request handler module
//!
//! Responsible for request routing dispatch: the MIME override stage followed
//! by static file resolution.

pub mod mime_override;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
