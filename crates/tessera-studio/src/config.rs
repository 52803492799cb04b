//! Studio configuration from the environment and command line.

use std::path::PathBuf;
use std::time::Duration;

use tessera_engine::view::ZoomLimits;
use thiserror::Error;

pub const SERVICE_URL_VAR: &str = "TESSERA_SERVICE_URL";
pub const SERVICE_TIMEOUT_VAR: &str = "TESSERA_SERVICE_TIMEOUT_MS";
pub const ZOOM_LIMITS_VAR: &str = "TESSERA_ZOOM_LIMITS";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("TESSERA_SERVICE_TIMEOUT_MS must be a positive number of milliseconds, got `{0}`")]
    Timeout(String),

    #[error("TESSERA_ZOOM_LIMITS must be `min,max` with 0 < min <= max, got `{0}`")]
    ZoomLimits(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudioConfig {
    /// Base URL of the triangulation service; requests go to `{url}/triangulate`.
    pub service_url: String,
    pub service_timeout: Duration,
    /// Applied to both viewports. `None` leaves zoom unbounded.
    pub zoom_limits: Option<ZoomLimits>,
    /// Point file imported at startup.
    pub startup_file: Option<PathBuf>,
    /// Explicit logger filter (`RUST_LOG` syntax).
    pub log_filter: Option<String>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:8080".to_string(),
            service_timeout: Duration::from_millis(10_000),
            zoom_limits: None,
            startup_file: None,
            log_filter: None,
        }
    }
}

impl StudioConfig {
    /// Reads the process environment and the first positional argument.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_sources(|key| std::env::var(key).ok(), std::env::args().skip(1))
    }

    /// Builds a config from a variable lookup and the arguments after the
    /// program name. Unset or blank variables keep their defaults.
    pub fn from_sources<I>(var: impl Fn(&str) -> Option<String>, args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let var = |key: &str| var(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(url) = var(SERVICE_URL_VAR) {
            config.service_url = url.trim_end_matches('/').to_string();
        }

        if let Some(raw) = var(SERVICE_TIMEOUT_VAR) {
            let ms: u64 = raw.parse().map_err(|_| ConfigError::Timeout(raw.clone()))?;
            if ms == 0 {
                return Err(ConfigError::Timeout(raw));
            }
            config.service_timeout = Duration::from_millis(ms);
        }

        if let Some(raw) = var(ZOOM_LIMITS_VAR) {
            config.zoom_limits = Some(parse_zoom_limits(&raw).ok_or(ConfigError::ZoomLimits(raw))?);
        }

        config.log_filter = var("RUST_LOG");
        config.startup_file = args
            .into_iter()
            .find(|a| !a.starts_with('-'))
            .map(PathBuf::from);

        Ok(config)
    }
}

fn parse_zoom_limits(raw: &str) -> Option<ZoomLimits> {
    let (min, max) = raw.split_once(',')?;
    ZoomLimits::new(min.trim().parse().ok()?, max.trim().parse().ok()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)], args: &[&str]) -> Result<StudioConfig, ConfigError> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        StudioConfig::from_sources(
            |k| vars.get(k).cloned(),
            args.iter().map(|a| a.to_string()),
        )
    }

    #[test]
    fn defaults_without_input() {
        assert_eq!(config(&[], &[]).unwrap(), StudioConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let c = config(
            &[
                (SERVICE_URL_VAR, "http://mesh:9000/"),
                (SERVICE_TIMEOUT_VAR, "2500"),
                (ZOOM_LIMITS_VAR, "0.1, 50"),
                ("RUST_LOG", "debug"),
            ],
            &["shape.json"],
        )
        .unwrap();

        assert_eq!(c.service_url, "http://mesh:9000");
        assert_eq!(c.service_timeout, Duration::from_millis(2500));
        assert_eq!(c.zoom_limits, ZoomLimits::new(0.1, 50.0));
        assert_eq!(c.startup_file, Some(PathBuf::from("shape.json")));
        assert_eq!(c.log_filter.as_deref(), Some("debug"));
    }

    #[test]
    fn blank_values_keep_defaults() {
        let c = config(&[(SERVICE_URL_VAR, "  ")], &[]).unwrap();
        assert_eq!(c.service_url, "http://localhost:8080");
    }

    #[test]
    fn rejects_bad_timeout() {
        assert!(matches!(config(&[(SERVICE_TIMEOUT_VAR, "soon")], &[]), Err(ConfigError::Timeout(_))));
        assert!(matches!(config(&[(SERVICE_TIMEOUT_VAR, "0")], &[]), Err(ConfigError::Timeout(_))));
    }

    #[test]
    fn rejects_bad_zoom_limits() {
        for raw in ["5", "2,1", "0,1", "a,b"] {
            assert!(
                matches!(config(&[(ZOOM_LIMITS_VAR, raw)], &[]), Err(ConfigError::ZoomLimits(_))),
                "accepted {raw:?}"
            );
        }
    }

    #[test]
    fn flags_are_not_files() {
        let c = config(&[], &["--verbose", "points.json"]).unwrap();
        assert_eq!(c.startup_file, Some(PathBuf::from("points.json")));
    }
}
