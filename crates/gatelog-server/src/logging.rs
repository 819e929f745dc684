//! Logging initialization.
//!
//! Development runs log pretty to stdout. Production deployments add a
//! rolling daily JSON file under the configured log directory, so scan
//! investigations can correlate request traces with the event log.

use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gatelog_core::GatelogConfig;

/// Keeps the non-blocking writers alive for the life of the process.
static GUARDS: OnceLock<Vec<WorkerGuard>> = OnceLock::new();

/// Initialize tracing from the loaded configuration.
///
/// The filter comes from `RUST_LOG` when set, otherwise from
/// `config.log_level`. In production mode output goes to a rolling daily
/// JSON file in `config.log_dir` plus compact stdout (for journald);
/// development mode logs pretty to stdout with span events.
///
/// # Errors
///
/// Returns an error if the configured log level does not parse as a
/// filter directive.
pub fn init(config: &GatelogConfig, is_production: bool) -> anyhow::Result<()> {
    let env_filter = build_filter(&config.log_level)?;
    let mut guards = Vec::new();

    if is_production {
        std::fs::create_dir_all(&config.log_dir).ok();
        let file_appender =
            RollingFileAppender::new(Rotation::DAILY, &config.log_dir, "gatelog");
        let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
        let (stdout_writer, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
        guards.push(file_guard);
        guards.push(stdout_guard);

        let file_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(file_writer)
            .with_file(true)
            .with_line_number(true);
        let stdout_layer = tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(stdout_writer)
            .with_ansi(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(stdout_layer)
            .init();
    } else {
        let stdout_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stdout_layer)
            .init();
    }

    let _ = GUARDS.set(guards);
    Ok(())
}

fn build_filter(configured_level: &str) -> anyhow::Result<EnvFilter> {
    Ok(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(configured_level))?)
}
