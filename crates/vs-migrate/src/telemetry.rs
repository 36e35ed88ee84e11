use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

use crate::error::TelemetryError;

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` is used.
pub fn init_tracing(default_filter: &str) -> Result<(), TelemetryError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(TelemetryError)
}

/// Progress bar over venues; the length is set by the stage once known.
pub fn progress_bar() -> ProgressBar {
    let progress = ProgressBar::new(0);
    if let Ok(style) =
        ProgressStyle::with_template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
    {
        progress.set_style(style);
    }
    progress
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_an_error() {
        let _ = init_tracing("info");

        let result = init_tracing("debug");

        assert!(result
            .unwrap_err()
            .to_string()
            .starts_with("failed to initialize tracing"));
    }
}
