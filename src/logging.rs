use std::sync::Once;

use env_logger::{Builder, Env};

/// Logger configuration.
///
/// `env_filter` uses the `env_logger` filter syntax, e.g. "info" or
/// "insanity=debug,vulkano=warn". It is applied on top of `RUST_LOG`, which
/// defaults to "info" when unset.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        logger_builder(&config, Env::default().default_filter_or("info")).init();
        log::debug!("logging initialized");
    });
}

/// Builder reading its filter from `env`, then from `config`.
pub fn logger_builder(config: &LoggingConfig, env: Env<'_>) -> Builder {
    let mut builder = Builder::from_env(env);
    if let Some(filter) = &config.env_filter {
        builder.parse_filters(filter);
    }
    builder.write_style(config.write_style);
    builder
}
