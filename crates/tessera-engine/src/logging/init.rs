use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "tessera_engine=debug,wgpu_core=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    /// Keep wgpu/naga internals at `warn` unless the filter names them.
    pub quiet_gpu: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            quiet_gpu: true,
        }
    }
}

const GPU_TARGETS: [&str; 4] = ["wgpu_core", "wgpu_hal", "naga", "wgpu"];

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Filter precedence: `config.env_filter`, then `RUST_LOG`, then `info`.
/// Subsequent calls are ignored. Intended usage is early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if config.quiet_gpu {
            for target in GPU_TARGETS {
                builder.filter_module(target, log::LevelFilter::Warn);
            }
        }

        match resolve_filter(config.env_filter, std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(log::LevelFilter::Info);
            }
        }

        builder.write_style(config.write_style);

        // A logger installed by a test harness or host wins.
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized");
    });
}

fn resolve_filter(explicit: Option<String>, env: Option<String>) -> Option<String> {
    explicit.or(env).filter(|f| !f.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let f = resolve_filter(Some("debug".into()), Some("warn".into()));
        assert_eq!(f.as_deref(), Some("debug"));
    }

    #[test]
    fn env_is_fallback_and_blank_is_ignored() {
        assert_eq!(resolve_filter(None, Some("warn".into())).as_deref(), Some("warn"));
        assert_eq!(resolve_filter(None, Some("  ".into())), None);
        assert_eq!(resolve_filter(None, None), None);
    }

    #[test]
    fn init_is_idempotent() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig::default());
    }
}
