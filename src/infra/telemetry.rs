use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

pub const METRIC_LOCALE_REDIRECT_TOTAL: &str = "site_locale_redirect_total";
pub const METRIC_PAGE_RENDER_TOTAL: &str = "site_page_render_total";
pub const METRIC_NOT_FOUND_TOTAL: &str = "site_not_found_total";

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
            METRIC_LOCALE_REDIRECT_TOTAL,
            Unit::Count,
            "Requests redirected to a locale-prefixed path."
        );
        describe_counter!(
            METRIC_PAGE_RENDER_TOTAL,
            Unit::Count,
            "Pages rendered, labelled by page and locale."
        );
        describe_counter!(
            METRIC_NOT_FOUND_TOTAL,
            Unit::Count,
            "Requests answered with the not-found page."
        );
    });
}
