//! Tracing subscriber setup for binaries and harnesses embedding the pipeline.

use tracing_subscriber::EnvFilter;

use topic_types::Settings;

/// Install a global fmt subscriber.
///
/// `RUST_LOG` wins over `settings.log_level`. Returns false if a global
/// subscriber was already installed.
pub fn init_tracing(settings: &Settings) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        let settings = Settings::default();
        init_tracing(&settings);
        // A global subscriber is now installed either way
        assert!(!init_tracing(&settings));
    }
}
