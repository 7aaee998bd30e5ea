//! Observability (logging, tracing)
//!
//! Structured logging for build runs. `RUST_LOG` always wins over the
//! configured level.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingSettings};

/// Initialize the logging stack
///
/// Sets up:
/// - Environment-based log level filtering (falls back to `settings.level`)
/// - Pretty, compact or JSON formatting on stderr
///
/// # Example
///
/// ```rust,no_run
/// use pigment_atlas::config::LoggingSettings;
/// use pigment_atlas::observability;
///
/// # fn main() -> anyhow::Result<()> {
/// observability::init(&LoggingSettings::default())?;
/// tracing::info!("Build started");
/// # Ok(())
/// # }
/// ```
pub fn init(settings: &LoggingSettings) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    let fmt = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    match settings.format {
        LogFormat::Pretty => registry.with(fmt.pretty()).try_init()?,
        LogFormat::Compact => registry.with(fmt.compact()).try_init()?,
        LogFormat::Json => registry.with(fmt.json()).try_init()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_an_error_not_a_panic() {
        let settings = LoggingSettings {
            format: LogFormat::Compact,
            level: "warn".to_string(),
        };
        let first = init(&settings);
        let second = init(&settings);
        // whichever test installed the global subscriber first, the second
        // call here must fail cleanly
        assert!(first.is_err() || second.is_err());
    }
}
