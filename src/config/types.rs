// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Static root configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StaticFilesConfig {
    /// Directory all request paths are resolved against
    pub root: String,
    /// Files tried, in order, when a directory is requested
    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,
    /// `max-age` value of the `Cache-Control` header, in seconds
    #[serde(default)]
    pub max_age: u64,
}

fn default_index_files() -> Vec<String> {
    vec!["index.html".to_string()]
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: "dist".to_string(),
            index_files: default_index_files(),
            max_age: 0,
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    /// Seconds an idle keep-alive connection stays open; 0 disables keep-alive
    pub keep_alive_timeout: u64,
    /// Seconds allowed to receive a request head; 0 disables the limit
    pub read_timeout: u64,
    /// Seconds in-flight connections get to finish after a shutdown signal
    pub shutdown_timeout: u64,
    pub max_connections: Option<u64>,
}
