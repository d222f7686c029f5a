//! Runtime configuration for the binary.
//!
//! Every setting comes from an `ENDOTYPE_*` environment variable and has a
//! default. The core library never reads configuration.

use std::path::PathBuf;
use std::time::Duration;

pub const LOG_MODE_ENV: &str = "ENDOTYPE_LOG_MODE";
pub const LOG_FILE_ENV: &str = "ENDOTYPE_LOG_FILE";
pub const LATENCY_ENV: &str = "ENDOTYPE_SIMULATED_LATENCY_MS";
pub const EXPORT_DIR_ENV: &str = "ENDOTYPE_EXPORT_DIR";
pub const SANITIZE_MAX_BYTES_ENV: &str = "ENDOTYPE_SANITIZE_MAX_BYTES";

const DEFAULT_LOG_FILE: &str = "endotype.log";
const DEFAULT_LATENCY_MS: u64 = 1000;
const DEFAULT_EXPORT_DIR: &str = "reports";
pub const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when stdout is a terminal (the TUI owns it), stdout otherwise
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(&self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_mode: LogMode,
    pub log_file: PathBuf,
    /// Cosmetic delay before a prediction is shown
    pub simulated_latency: Duration,
    pub export_dir: PathBuf,
    pub sanitize_max_bytes: usize,
    /// Rejected settings, held until a subscriber exists to log them
    pub warnings: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            simulated_latency: Duration::from_millis(DEFAULT_LATENCY_MS),
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            sanitize_max_bytes: DEFAULT_SANITIZE_MAX_BYTES,
            warnings: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    ///
    /// Unparseable numbers fall back to their defaults and are recorded in
    /// `warnings`. Nothing is logged here: this runs before logging is set up.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(mode) = lookup(LOG_MODE_ENV) {
            config.log_mode = LogMode::parse(&mode);
        }
        if let Some(path) = lookup(LOG_FILE_ENV).filter(|p| !p.trim().is_empty()) {
            config.log_file = PathBuf::from(path);
        }
        if let Some(dir) = lookup(EXPORT_DIR_ENV).filter(|p| !p.trim().is_empty()) {
            config.export_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup(LATENCY_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.simulated_latency = Duration::from_millis(ms),
                Err(_) => config.reject(LATENCY_ENV, &raw),
            }
        }
        if let Some(raw) = lookup(SANITIZE_MAX_BYTES_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.sanitize_max_bytes = n,
                _ => config.reject(SANITIZE_MAX_BYTES_ENV, &raw),
            }
        }

        config
    }

    fn reject(&mut self, key: &str, raw: &str) {
        self.warnings
            .push(format!("Ignoring invalid {key}: {raw:?}, using default"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config.log_mode, LogMode::Auto);
        assert_eq!(config.simulated_latency, Duration::from_millis(1000));
        assert_eq!(config.export_dir, PathBuf::from("reports"));
        assert_eq!(config.sanitize_max_bytes, 16 * 1024);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (LOG_MODE_ENV, "STDOUT"),
            (LOG_FILE_ENV, "/tmp/e.log"),
            (LATENCY_ENV, "0"),
            (EXPORT_DIR_ENV, "/tmp/out"),
            (SANITIZE_MAX_BYTES_ENV, "512"),
        ]));
        assert_eq!(config.log_mode, LogMode::Stdout);
        assert_eq!(config.log_file, PathBuf::from("/tmp/e.log"));
        assert_eq!(config.simulated_latency, Duration::ZERO);
        assert_eq!(config.export_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.sanitize_max_bytes, 512);
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (LATENCY_ENV, "soon"),
            (SANITIZE_MAX_BYTES_ENV, "0"),
        ]));
        assert_eq!(config.simulated_latency, Duration::from_millis(1000));
        assert_eq!(config.sanitize_max_bytes, DEFAULT_SANITIZE_MAX_BYTES);
        assert_eq!(config.warnings.len(), 2);
        assert!(config.warnings[0].contains(LATENCY_ENV));
        assert!(config.warnings[0].contains("\"soon\""));
        assert!(config.warnings[1].contains(SANITIZE_MAX_BYTES_ENV));
    }

    #[test]
    fn test_valid_settings_record_no_warnings() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (LATENCY_ENV, "250"),
            (SANITIZE_MAX_BYTES_ENV, "4096"),
        ]));
        assert!(config.warnings.is_empty());
        assert_eq!(config.simulated_latency, Duration::from_millis(250));
    }

    #[test]
    fn test_log_mode_resolution() {
        assert!(LogMode::Auto.use_file(true));
        assert!(!LogMode::Auto.use_file(false));
        assert!(LogMode::File.use_file(false));
        assert!(!LogMode::Stdout.use_file(true));
        assert_eq!(LogMode::parse("bogus"), LogMode::Auto);
    }
}
