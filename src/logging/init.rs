use color_eyre::eyre::Result;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::{self, format::FmtSpan};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use super::{LogConfig, LogFormat, LOG_FILENAME};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("itemdeck_daemon={}", config.level)))
}

/// Install the global subscriber: the rolling log file plus stdout, both
/// in the configured format, with span traces for `color-eyre` reports.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    std::fs::create_dir_all(&config.log_dir)?;
    let file = RollingFileAppender::new(config.rotation.clone(), &config.log_dir, LOG_FILENAME);

    let layers: Vec<BoxedLayer> = match config.format {
        LogFormat::Json => vec![
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_events(FmtSpan::CLOSE)
                .with_writer(file)
                .with_filter(env_filter(config))
                .boxed(),
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_events(FmtSpan::CLOSE)
                .with_writer(std::io::stdout)
                .with_filter(env_filter(config))
                .boxed(),
        ],
        LogFormat::Plain => vec![
            fmt::layer()
                .with_ansi(false)
                .with_span_events(FmtSpan::CLOSE)
                .with_writer(file)
                .with_filter(env_filter(config))
                .boxed(),
            fmt::layer()
                .with_span_events(FmtSpan::CLOSE)
                .with_writer(std::io::stdout)
                .with_filter(env_filter(config))
                .boxed(),
        ],
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(ErrorLayer::default())
        .try_init()?;
    Ok(())
}

/// `hourly` or `never` (any case); everything else rotates daily.
#[must_use]
pub fn parse_rotation(s: &str) -> Rotation {
    match s.to_ascii_lowercase().as_str() {
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}
