//! Structured telemetry for transformation runs.
//!
//! Events go to standard error so that standard output stays free for JSON
//! Lines results. The filter is checked on every call, so a bad
//! `log_filter` is reported even when an earlier run already installed the
//! subscriber.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use refract_config::{Config, LogFormat};

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Handle returned when telemetry has been initialised.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured `log_filter` is not a valid directive list.
    #[error("invalid log filter '{directives}': {message}")]
    Filter {
        /// The rejected directives.
        directives: String,
        /// Parser diagnostic.
        message: String,
    },
    /// Failed to install the tracing subscriber.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Parses `directives` such as `info` or `refract::pipeline=debug,warn`.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] naming the rejected directives.
pub fn event_filter(directives: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(directives).map_err(|error| TelemetryError::Filter {
        directives: directives.to_owned(),
        message: error.to_string(),
    })
}

/// Installs the global subscriber for `config` the first time it is called.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the filter does not parse or another
/// subscriber is already installed.
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    let filter = event_filter(config.log_filter())?;
    TELEMETRY_GUARD
        .get_or_try_init(|| {
            tracing::subscriber::set_global_default(run_subscriber(filter, config.log_format()))
                .map_err(TelemetryError::Subscriber)
        })
        .map(|_| TelemetryHandle)
}

fn run_subscriber(filter: EnvFilter, format: LogFormat) -> Box<dyn Subscriber + Send + Sync> {
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_timer(fmt::time::UtcTime::rfc_3339());

    match format {
        LogFormat::Json => Box::new(builder.json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder.compact().finish()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refract_config::NoMatchPolicy;
    use rstest::rstest;

    #[rstest]
    #[case("info")]
    #[case("off")]
    #[case("refract::pipeline=debug,refract::summary=info,warn")]
    fn accepts_run_directives(#[case] directives: &str) {
        assert!(event_filter(directives).is_ok());
    }

    #[rstest]
    fn rejected_filter_names_the_directives() {
        let error = event_filter("refract::pipeline=loudest").expect_err("invalid level");
        assert!(matches!(error, TelemetryError::Filter { .. }));
        assert!(
            error.to_string().contains("'refract::pipeline=loudest'"),
            "unexpected message: {error}"
        );
    }

    #[rstest]
    fn bad_filter_is_reported_after_installation() {
        let quiet = Config::new(["while_to_for"], NoMatchPolicy::Skip).with_log_filter("off");
        initialise(&quiet).expect("first initialisation");
        initialise(&quiet).expect("repeat initialisation");

        let noisy = quiet.with_log_filter("refract=loudest");
        assert!(matches!(
            initialise(&noisy),
            Err(TelemetryError::Filter { .. })
        ));
    }
}
