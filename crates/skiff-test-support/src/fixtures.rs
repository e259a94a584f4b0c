//! Test fixtures and logging helpers.

use skiff_events::InfoHash;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a tracing subscriber suited to test output.
///
/// Only the first call in a process installs anything, so every test can call
/// it unconditionally.
pub fn init_test_logging() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with(fmt::layer().with_target(false).with_test_writer())
        .try_init();
}

/// Info-hash with every byte set to `byte`, for readable test identities.
#[must_use]
pub const fn info_hash(byte: u8) -> InfoHash {
    InfoHash::new([byte; 20])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_hash_repeats_the_byte() {
        assert_eq!(info_hash(0xAB).as_bytes(), &[0xAB; 20]);
    }

    #[test]
    fn init_test_logging_tolerates_repeat_calls() {
        init_test_logging();
        init_test_logging();
    }
}
