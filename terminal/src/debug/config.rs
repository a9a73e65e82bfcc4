//! Logging configuration from environment variables

use std::path::PathBuf;

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "medichain=info,lib_wallet=info,warn";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log directory (for rotation)
    pub log_dir: PathBuf,
    /// Log file path of today's log
    pub log_file: PathBuf,
    /// Log level filter (e.g., "medichain=debug,info")
    pub log_level: String,
    /// Mirror log output to stderr
    pub stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        let log_dir = PathBuf::from("logs");
        Self {
            log_file: log_dir.join("medichain.log"),
            log_dir,
            log_level: DEFAULT_LOG_FILTER.to_string(),
            stderr: false,
        }
    }
}

impl LogConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let log_dir = std::env::var("MEDICHAIN_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("logs"));

        Self {
            log_file: log_dir.join("medichain.log"),
            log_dir,
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
            stderr: std::env::var("MEDICHAIN_LOG_STDERR")
                .map(|v| v == "1")
                .unwrap_or(false),
        }
    }

    /// Check if debug logging is enabled
    pub fn is_debug_enabled(&self) -> bool {
        self.log_level.contains("debug") || self.log_level.contains("trace")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = LogConfig::default();
        assert_eq!(config.log_file, PathBuf::from("logs/medichain.log"));
        assert!(!config.stderr);
        assert!(!config.is_debug_enabled());
    }

    #[test]
    fn test_debug_detection() {
        let config = LogConfig {
            log_level: "lib_wallet=debug,warn".to_string(),
            ..LogConfig::default()
        };
        assert!(config.is_debug_enabled());
    }
}
