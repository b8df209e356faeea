use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::cache::metrics::{
    METRIC_CACHE_HIT, METRIC_CACHE_MISS, METRIC_CACHE_REFRESH, METRIC_CACHE_REFRESH_FAILED,
    METRIC_CACHE_REFRESH_MS, METRIC_DIRECT_SCAN, METRIC_ROWS_SKIPPED,
};
use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            METRIC_CACHE_HIT,
            Unit::Count,
            "Schedule reads served from a valid snapshot."
        );
        describe_counter!(
            METRIC_CACHE_MISS,
            Unit::Count,
            "Schedule reads that found no valid snapshot."
        );
        describe_counter!(
            METRIC_CACHE_REFRESH,
            Unit::Count,
            "Snapshot refresh attempts."
        );
        describe_counter!(
            METRIC_CACHE_REFRESH_FAILED,
            Unit::Count,
            "Snapshot refreshes abandoned because the store failed."
        );
        describe_counter!(
            METRIC_ROWS_SKIPPED,
            Unit::Count,
            "Schedule rows dropped for unusable timestamps."
        );
        describe_counter!(
            METRIC_DIRECT_SCAN,
            Unit::Count,
            "Reads answered by scanning the store directly."
        );
        describe_histogram!(
            METRIC_CACHE_REFRESH_MS,
            Unit::Milliseconds,
            "Snapshot refresh latency in milliseconds."
        );
    });
}
