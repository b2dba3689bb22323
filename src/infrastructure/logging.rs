//! Log formatting for the global subscriber

use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    registry::LookupSpan,
    Layer,
};

use crate::config::LogFormat;

/// Formatting layer for the configured output format
pub fn fmt_layer<S>(format: &LogFormat) -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn test_both_formats_build_a_subscriber() {
        for format in [LogFormat::Json, LogFormat::Pretty] {
            let subscriber = tracing_subscriber::registry().with(fmt_layer(&format));
            tracing::subscriber::with_default(subscriber, || {
                tracing::info!(format = ?format, "formatted");
            });
        }
    }
}
