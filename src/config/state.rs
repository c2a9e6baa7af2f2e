// Application state module
// Shared, read-only state handed to every connection

use std::path::PathBuf;

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Static root as configured
    pub static_root: PathBuf,
    access_log: bool,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            static_root: config.static_root(),
            access_log: config.logging.access_log,
        }
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.access_log
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_log_flag_follows_config() {
        let mut config = Config::default();
        assert!(AppState::new(&config).access_log_enabled());

        config.logging.access_log = false;
        let state = AppState::new(&config);
        assert!(!state.access_log_enabled());
        assert_eq!(state.static_root, PathBuf::from("dist"));
    }
}
